//! Field normalization applied to freshly-extracted captures.
//!
//! Runs once per phase, after pattern extraction and before the captures
//! are merged into the session fields. Rules only fire for keys the active
//! phase actually captured, so phases never normalize each other's data.

use super::FieldMap;

fn value_is(captures: &FieldMap, key: &str, expected: &str) -> bool {
    matches!(captures.get(key), Some(Some(v)) if v == expected)
}

fn set(captures: &mut FieldMap, key: &str, value: &str) {
    captures.insert(key.to_string(), Some(value.to_string()));
}

pub(crate) fn normalize_captures(captures: &mut FieldMap) {
    // Strict rendering forces the internal resolution; the numeric scale is
    // meaningless while it is on.
    if value_is(captures, "strict_rendering_mode", "true") {
        set(captures, "resolution_scale", "Strict Mode");
    }

    // A zero thread count means "pick for me" in the emitter's config.
    if value_is(captures, "spu_threads", "0") {
        set(captures, "spu_threads", "auto");
    }

    // Depending on build variant the emitter labels the same setting either
    // "scheduler" or "secondary cores"; the latter wins when present.
    if let Some(Some(cores)) = captures.get("spu_secondary_cores").cloned() {
        captures.insert("thread_scheduler".to_string(), Some(cores));
    }

    // Adapters serialize as a quoted string; an empty one means the backend
    // never enumerated a device.
    for key in ["vulkan_gpu", "d3d_gpu"] {
        if value_is(captures, key, "\"\"") {
            set(captures, key, "Unknown");
        }
    }

    // The GPU in use is the Vulkan adapter when known, with the Direct3D
    // adapter as fallback.
    if captures.contains_key("vulkan_gpu") {
        let vulkan = captures.get("vulkan_gpu").cloned().flatten();
        let gpu_info = match vulkan {
            Some(v) if v != "Unknown" => v,
            _ => captures
                .get("d3d_gpu")
                .cloned()
                .flatten()
                .unwrap_or_else(|| "Unknown".to_string()),
        };
        captures.insert("gpu_info".to_string(), Some(gpu_info));
    }

    // Anisotropic filter override: 0 = driver choice, 1 = forced off.
    if value_is(captures, "af_override", "0") {
        set(captures, "af_override", "auto");
    } else if value_is(captures, "af_override", "1") {
        set(captures, "af_override", "disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Option<&str>)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn get<'a>(m: &'a FieldMap, key: &str) -> Option<&'a str> {
        m.get(key).and_then(|v| v.as_deref())
    }

    #[test]
    fn strict_rendering_overrides_resolution_scale() {
        let mut m = map(&[
            ("strict_rendering_mode", Some("true")),
            ("resolution_scale", Some("150")),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "resolution_scale"), Some("Strict Mode"));

        let mut m = map(&[
            ("strict_rendering_mode", Some("false")),
            ("resolution_scale", Some("150")),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "resolution_scale"), Some("150"));
    }

    #[test]
    fn zero_spu_threads_becomes_auto() {
        let mut m = map(&[("spu_threads", Some("0"))]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "spu_threads"), Some("auto"));

        let mut m = map(&[("spu_threads", Some("2"))]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "spu_threads"), Some("2"));
    }

    #[test]
    fn secondary_cores_overrides_thread_scheduler() {
        let mut m = map(&[
            ("thread_scheduler", None),
            ("spu_secondary_cores", Some("true")),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "thread_scheduler"), Some("true"));

        // A non-participating capture must not override.
        let mut m = map(&[
            ("thread_scheduler", Some("OS")),
            ("spu_secondary_cores", None),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "thread_scheduler"), Some("OS"));
    }

    #[test]
    fn empty_quoted_adapters_become_unknown() {
        let mut m = map(&[
            ("vulkan_gpu", Some("\"\"")),
            ("d3d_gpu", Some("\"Radeon RX 580\"")),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "vulkan_gpu"), Some("Unknown"));
        assert_eq!(get(&m, "gpu_info"), Some("\"Radeon RX 580\""));
    }

    #[test]
    fn vulkan_adapter_preferred_when_known() {
        let mut m = map(&[
            ("vulkan_gpu", Some("\"GTX 1080\"")),
            ("d3d_gpu", Some("\"Radeon RX 580\"")),
        ]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "gpu_info"), Some("\"GTX 1080\""));
    }

    #[test]
    fn gpu_info_unknown_when_both_adapters_empty() {
        let mut m = map(&[("vulkan_gpu", Some("\"\"")), ("d3d_gpu", Some("\"\""))]);
        normalize_captures(&mut m);
        assert_eq!(get(&m, "gpu_info"), Some("Unknown"));
    }

    #[test]
    fn af_override_literals() {
        for (input, expected) in [("0", "auto"), ("1", "disabled"), ("16x", "16x")] {
            let mut m = map(&[("af_override", Some(input))]);
            normalize_captures(&mut m);
            assert_eq!(get(&m, "af_override"), Some(expected));
        }
    }

    #[test]
    fn rules_ignore_unrelated_phases() {
        // A phase that captured none of the special keys is left untouched.
        let mut m = map(&[("build_and_specs", Some("v0.0.5\n"))]);
        normalize_captures(&mut m);
        assert_eq!(m.len(), 1);
    }
}
