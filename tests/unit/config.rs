use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = ScrubConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg.height_factor, 300.0);
    assert_eq!(cfg.total_frames, 180);
    assert!(cfg.frame_locators.is_empty());
    assert!(cfg.surface_style_class.is_none());
    assert_eq!(cfg.clear_rgba, [0, 0, 0, 0]);
    assert!(cfg.custom_renderer().is_none());
}

#[test]
fn camel_case_aliases_are_accepted() {
    let cfg = ScrubConfig::from_json_str(
        r#"{
            "heightVh": 450,
            "totalFrames": 24,
            "imageUrls": ["/frames/0001.png", "/frames/0002.png"],
            "className": "hero"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.height_factor, 450.0);
    assert_eq!(cfg.total_frames, 24);
    assert_eq!(cfg.frame_locators.len(), 2);
    assert_eq!(cfg.surface_style_class.as_deref(), Some("hero"));

    let cfg = ScrubConfig::from_json_str(r#"{"heightFactor": 200, "frameLocators": ["a.png"]}"#)
        .unwrap();
    assert_eq!(cfg.height_factor, 200.0);
    assert_eq!(cfg.frame_locators, vec!["a.png".to_owned()]);
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{"total_frames": 0}"#,
        r#"{"height_factor": 0}"#,
        r#"{"height_factor": -5}"#,
        r#"{"loader_threads": 0}"#,
        r#"{"frame_locators": ["ok.png", "  "]}"#,
    ] {
        let err = ScrubConfig::from_json_str(json).unwrap_err();
        assert!(
            err.to_string().starts_with("validation error:"),
            "{json}: {err}"
        );
    }
}

#[test]
fn malformed_json_is_an_error() {
    let err = ScrubConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("parse scrub config JSON"));
}

#[test]
fn section_height_is_percent_of_viewport() {
    let cfg = ScrubConfig::default();
    assert_eq!(cfg.section_height(800.0), 2400.0);
    assert_eq!(cfg.section_height(0.0), 0.0);
}

#[test]
fn json_path_resolves_relative_paths_against_file_dir() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/config_unit");
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join("plain.json");
    std::fs::write(&path, r#"{"total_frames": 10}"#).unwrap();
    let cfg = ScrubConfig::from_json_path(&path).unwrap();
    assert_eq!(cfg.assets_root.as_deref(), Some(dir.as_path()));
    assert_eq!(cfg.fs_fetcher().root(), dir.as_path());

    let path = dir.join("nested.json");
    std::fs::write(&path, r#"{"assets_root": "frames", "font_path": "fonts/a.ttf"}"#).unwrap();
    let cfg = ScrubConfig::from_json_path(&path).unwrap();
    assert_eq!(cfg.assets_root, Some(dir.join("frames")));
    assert_eq!(cfg.font_path, Some(dir.join("fonts/a.ttf")));
}

#[test]
fn missing_config_file_is_an_error() {
    let err = ScrubConfig::from_json_path("definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("read scrub config"));
}

#[test]
fn custom_renderer_becomes_the_fallback_source() {
    let cfg = ScrubConfig::default().with_renderer(Arc::new(
        |_t: &mut crate::render::surface::DrawTarget<'_>, _i: u32, _n: u32, _w: f64, _h: f64| {
            Ok(())
        },
    ));
    assert!(cfg.custom_renderer().is_some());
    assert!(format!("{cfg:?}").contains("custom_renderer: true"));
    assert!(matches!(
        cfg.fallback_source().unwrap(),
        FrameSource::Procedural(_)
    ));
}

#[test]
fn missing_font_fails_fallback_source() {
    let cfg = ScrubConfig {
        font_path: Some(PathBuf::from("nope/missing.ttf")),
        ..ScrubConfig::default()
    };
    assert!(cfg.fallback_source().is_err());
}

#[test]
fn loader_threads_come_from_config_without_env_override() {
    if std::env::var_os(LOADER_THREADS_ENV).is_some() {
        return;
    }
    let cfg = ScrubConfig {
        loader_threads: Some(3),
        ..ScrubConfig::default()
    };
    assert_eq!(cfg.effective_loader_threads(), Some(3));
}

#[test]
fn serializes_with_snake_case_keys() {
    let cfg = ScrubConfig::default().with_frame_locators(["a.png"]);
    let json = serde_json::to_value(&cfg).unwrap();
    assert_eq!(json["height_factor"], 300.0);
    assert_eq!(json["frame_locators"][0], "a.png");
    assert!(json.get("custom_renderer").is_none());
}
