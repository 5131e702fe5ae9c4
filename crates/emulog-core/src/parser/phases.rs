//! The fixed phase schema of the diagnostic log.
//!
//! The log is a sequence of loosely-delimited sections, so the grammar is
//! encoded positionally: collect lines until the marker that opens the next
//! section appears, then run that phase's extraction pattern once over the
//! accumulated buffer. Markers are literal substrings rather than line-start
//! anchors, which keeps detection robust to whitespace drift in the emitter.

use once_cell::sync::Lazy;
use regex::Regex;

/// Post-processing steps a phase may run after extraction, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostProcess {
    /// Case-insensitive scan of the buffer against the configured triggers.
    PiracyCheck,
    /// Resolve the product serial through the catalog collaborator.
    IdentityLookup,
    /// Best-effort extraction of the loaded module list.
    LibraryList,
    /// Terminal marker: signals end of session.
    Done,
}

/// One entry of the fixed, ordered phase table. Never mutated at runtime.
pub(crate) struct Phase {
    pub end_marker: &'static str,
    pub pattern: Option<&'static Lazy<Regex>>,
    pub post: &'static [PostProcess],
}

static BUILD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(?P<build_and_specs>.*)").unwrap());

static SYSTEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"Path: (?:(?P<win_path>\w:/)|(?P<lin_path>/)).*?\n",
        r"(?:.* custom config: (?P<custom_config>.*?)\n.*?)?",
    ))
    .unwrap()
});

static CPU_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"Decoder: (?P<ppu_decoder>.*?)\n.*?",
        r"Threads: (?P<ppu_threads>.*?)\n.*?",
        r"(?:scheduler: (?P<thread_scheduler>.*?)\n.*?)?",
        r"Decoder: (?P<spu_decoder>.*?)\n.*?",
        r"(?:secondary cores: (?P<spu_secondary_cores>.*?)\n.*?)?",
        r"priority: (?P<spu_lower_thread_priority>.*?)\n.*?",
        r"SPU Threads: (?P<spu_threads>.*?)\n.*?",
        r"penalty: (?P<spu_delay_penalty>.*?)\n.*?",
        r"detection: (?P<spu_loop_detection>.*?)\n.*?",
        r"Loader: (?P<lib_loader>.*?)\n.*?",
        r"functions: (?P<hook_static_functions>.*?)\n.*",
    ))
    .unwrap()
});

static GPU_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"Renderer: (?P<renderer>.*?)\n.*?",
        r"Resolution: (?P<resolution>.*?)\n.*?",
        r"Frame limit: (?P<frame_limit>.*?)\n.*?",
        r"Write Color Buffers: (?P<write_color_buffers>.*?)\n.*?",
        r"VSync: (?P<vsync>.*?)\n.*?",
        r"Use GPU texture scaling: (?P<gpu_texture_scaling>.*?)\n.*?",
        r"Strict Rendering Mode: (?P<strict_rendering_mode>.*?)\n.*?",
        r"Disable Vertex Cache: (?P<vertex_cache>.*?)\n.*?",
        r"Resolution Scale: (?P<resolution_scale>.*?)\n.*?",
        r"Anisotropic Filter Override: (?P<af_override>.*?)\n.*?",
        r"Minimum Scalable Dimension: (?P<texture_scale_threshold>.*?)\n.*?",
        r"D3D12:\s*\n\s*Adapter: (?P<d3d_gpu>.*?)\n.*?",
        r"Vulkan:\s*\n\s*Adapter: (?P<vulkan_gpu>.*?)\n.*?",
    ))
    .unwrap()
});

/// Serial code of the form `<4 letters><5 digits>`.
pub(crate) static SERIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Serial: (?P<id>[A-Za-z]{4}\d{5})").unwrap());

pub(crate) static LIBRARIES_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Load libraries:(?P<libraries>.*)").unwrap());

/// The seven phases, in the order the emitter produces their sections.
/// Each end marker is the heading that opens the *next* section.
pub(crate) static PHASES: [Phase; 7] = [
    Phase {
        end_marker: "·",
        pattern: Some(&BUILD_PATTERN),
        post: &[],
    },
    Phase {
        end_marker: "Core:",
        pattern: Some(&SYSTEM_PATTERN),
        post: &[PostProcess::IdentityLookup, PostProcess::PiracyCheck],
    },
    Phase {
        end_marker: "VFS:",
        pattern: Some(&CPU_PATTERN),
        post: &[PostProcess::LibraryList],
    },
    Phase {
        end_marker: "Video:",
        pattern: None,
        post: &[],
    },
    Phase {
        end_marker: "Audio:",
        pattern: Some(&GPU_PATTERN),
        post: &[],
    },
    Phase {
        end_marker: "Input/Output:",
        pattern: None,
        post: &[],
    },
    Phase {
        end_marker: "Log:",
        pattern: None,
        post: &[PostProcess::Done],
    },
];
