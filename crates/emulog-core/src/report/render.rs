//! Report renderers.
//!
//! Both renderers are pure reads over a finished parsing session: calling
//! them twice yields identical output, and neither mutates session state.
//! They are only defined once the terminal phase completed; until then the
//! required keys may be missing and rendering fails with `ReportError`.

use crate::parser::{FieldMap, LogParser};
use crate::report::model::{EmbedReport, ReportError};

/// Looks up a required field key.
///
/// A key that is present with no value (an extraction group that did not
/// participate) renders as the literal `None`; a key that is absent
/// altogether is a contract violation and errors out.
fn required<'a>(fields: &'a FieldMap, key: &'static str) -> Result<&'a str, ReportError> {
    match fields.get(key) {
        Some(Some(value)) => Ok(value),
        Some(None) => Ok("None"),
        None => Err(ReportError::MissingField(key)),
    }
}

/// True when the key is present and carried an actual value.
fn participated(fields: &FieldMap, key: &str) -> bool {
    matches!(fields.get(key), Some(Some(_)))
}

/// The log carries one of two mutually exclusive path-prefix captures.
fn os_name(fields: &FieldMap) -> &'static str {
    if participated(fields, "win_path") {
        "Windows"
    } else {
        "Linux"
    }
}

fn has_custom_config(fields: &FieldMap) -> bool {
    participated(fields, "custom_config")
}

/// Human label for the library loader mode, derived from case-insensitive
/// substring checks against the raw loader field. The second component is
/// whether manual selection is involved at all.
fn loader_label(raw: &str) -> (String, bool) {
    let lower = raw.to_lowercase();
    let auto = lower.contains("auto");
    let manual = lower.contains("manual");
    let label = if auto && manual {
        "Auto & manual select".to_string()
    } else if auto {
        "Auto".to_string()
    } else if manual {
        "Manual selection".to_string()
    } else {
        raw.to_string()
    };
    (label, manual)
}

fn joined_libraries(libraries: &[String]) -> String {
    if libraries.is_empty() {
        "None".to_string()
    } else {
        libraries.join(", ")
    }
}

/// Renders the plain preformatted report block.
pub fn render_text(session: &LogParser) -> Result<String, ReportError> {
    let f = session.fields();
    let product = session.product_info().ok_or(ReportError::NoProductInfo)?;

    let config_note = if has_custom_config(f) {
        "\nUsing custom config!\n"
    } else {
        ""
    };

    let mut out = String::new();
    out.push_str("```");
    out.push_str(&product.render_text());
    out.push_str("\n\n");
    out.push_str(required(f, "build_and_specs")?);
    out.push_str(&format!("GPU: {}\n", required(f, "gpu_info")?));
    out.push_str(&format!("OS: {}\n", os_name(f)));
    out.push_str(config_note);
    out.push('\n');
    out.push_str(&format!(
        "PPU Decoder: {:>21} | Thread Scheduler: {}\n",
        required(f, "ppu_decoder")?,
        required(f, "thread_scheduler")?
    ));
    out.push_str(&format!(
        "SPU Decoder: {:>21} | SPU Threads: {}\n",
        required(f, "spu_decoder")?,
        required(f, "spu_threads")?
    ));
    out.push_str(&format!(
        "SPU Lower Thread Priority: {:>7} | Hook Static Functions: {}\n",
        required(f, "spu_lower_thread_priority")?,
        required(f, "hook_static_functions")?
    ));
    out.push_str(&format!(
        "SPU Loop Detection: {:>14} | Lib Loader: {}\n",
        required(f, "spu_loop_detection")?,
        required(f, "lib_loader")?
    ));
    out.push('\n');
    out.push_str(&format!(
        "Selected Libraries: {}\n",
        joined_libraries(session.libraries())
    ));
    out.push('\n');
    out.push_str(&format!(
        "Renderer: {:>24} | Frame Limit: {}\n",
        required(f, "renderer")?,
        required(f, "frame_limit")?
    ));
    out.push_str(&format!(
        "Resolution: {:>22} | Write Color Buffers: {}\n",
        required(f, "resolution")?,
        required(f, "write_color_buffers")?
    ));
    out.push_str(&format!(
        "Resolution Scale: {:>16} | Use GPU texture scaling: {}\n",
        required(f, "resolution_scale")?,
        required(f, "gpu_texture_scaling")?
    ));
    out.push_str(&format!(
        "Resolution Scale Threshold: {:>6} | Anisotropic Filter Override: {}\n",
        required(f, "texture_scale_threshold")?,
        required(f, "af_override")?
    ));
    out.push_str(&format!(
        "VSync: {:>27} | Disable Vertex Cache: {}\n",
        required(f, "vsync")?,
        required(f, "vertex_cache")?
    ));
    out.push_str("```");
    Ok(out)
}

/// Renders the structured, sectioned report document.
pub fn render_embed(session: &LogParser) -> Result<EmbedReport, ReportError> {
    let f = session.fields();
    let product = session.product_info().ok_or(ReportError::NoProductInfo)?;

    let custom = has_custom_config(f);
    let (loader, manual) = loader_label(required(f, "lib_loader")?);

    let build_info = format!(
        "{}GPU: {}",
        required(f, "build_and_specs")?,
        required(f, "gpu_info")?
    );

    let cpu_settings = format!(
        "`PPU Decoder: {:>21}`\n\
         `SPU Decoder: {:>21}`\n\
         `SPU Lower Thread Priority: {:>7}`\n\
         `SPU Loop Detection: {:>14}`\n\
         `Thread Scheduler: {:>16}`\n\
         `Detected OS: {:>21}`\n\
         `SPU Threads: {:>21}`\n\
         `Hook Static Functions: {:>11}`\n\
         `Lib Loader: {:>22}`\n",
        required(f, "ppu_decoder")?,
        required(f, "spu_decoder")?,
        required(f, "spu_lower_thread_priority")?,
        required(f, "spu_loop_detection")?,
        required(f, "thread_scheduler")?,
        os_name(f),
        required(f, "spu_threads")?,
        required(f, "hook_static_functions")?,
        loader,
    );

    let gpu_settings = format!(
        "`Renderer: {:>24}`\n\
         `Resolution: {:>22}`\n\
         `Resolution Scale: {:>16}`\n\
         `Resolution Scale Threshold: {:>6}`\n\
         `Write Color Buffers: {:>13}`\n\
         `Use GPU texture scaling: {:>9}`\n\
         `Anisotropic Filter: {:>14}`\n\
         `Frame Limit: {:>21}`\n\
         `Disable Vertex Cache: {:>12}`\n",
        required(f, "renderer")?,
        required(f, "resolution")?,
        required(f, "resolution_scale")?,
        required(f, "texture_scale_threshold")?,
        required(f, "write_color_buffers")?,
        required(f, "gpu_texture_scaling")?,
        required(f, "af_override")?,
        required(f, "frame_limit")?,
        required(f, "vertex_cache")?,
    );

    let mut embed = product
        .to_embed()
        .add_field("Build Info", build_info, false)
        .add_field(
            if custom { "Per-game CPU Settings" } else { "CPU Settings" },
            cpu_settings,
            true,
        )
        .add_field(
            if custom { "Per-game GPU Settings" } else { "GPU Settings" },
            gpu_settings,
            true,
        );

    if manual {
        embed = embed.add_field(
            "Selected Libraries",
            joined_libraries(session.libraries()),
            false,
        );
    }

    Ok(embed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_label_variants() {
        assert_eq!(
            loader_label("Load automatic and manual selection"),
            ("Auto & manual select".to_string(), true)
        );
        assert_eq!(loader_label("Load automatic"), ("Auto".to_string(), false));
        assert_eq!(
            loader_label("Manual selection"),
            ("Manual selection".to_string(), true)
        );
        assert_eq!(
            loader_label("Load liblv2.sprx only"),
            ("Load liblv2.sprx only".to_string(), false)
        );
    }

    #[test]
    fn joined_libraries_uses_placeholder_when_empty() {
        assert_eq!(joined_libraries(&[]), "None");
        assert_eq!(
            joined_libraries(&["libadec".to_string(), "libsre".to_string()]),
            "libadec, libsre"
        );
    }

    #[test]
    fn required_distinguishes_absent_key_from_absent_value() {
        let mut fields = FieldMap::new();
        fields.insert("present".to_string(), Some("x".to_string()));
        fields.insert("empty".to_string(), None);

        assert_eq!(required(&fields, "present"), Ok("x"));
        assert_eq!(required(&fields, "empty"), Ok("None"));
        assert_eq!(
            required(&fields, "gone"),
            Err(ReportError::MissingField("gone"))
        );
    }

    #[test]
    fn os_name_tracks_path_prefix_participation() {
        let mut fields = FieldMap::new();
        assert_eq!(os_name(&fields), "Linux");
        fields.insert("win_path".to_string(), None);
        assert_eq!(os_name(&fields), "Linux");
        fields.insert("win_path".to_string(), Some("C:/".to_string()));
        assert_eq!(os_name(&fields), "Windows");
    }
}
