use super::*;

#[test]
fn locator_normalization() {
    assert_eq!(normalize_locator("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_locator("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_locator("/frames/0001.jpg").unwrap(), "frames/0001.jpg");
    assert_eq!(normalize_locator("./x//y.png").unwrap(), "x/y.png");
    assert!(normalize_locator("../x.png").is_err());
    assert!(normalize_locator("a/../../x.png").is_err());
    assert!(normalize_locator("https://cdn.example/0001.jpg").is_err());
    assert!(normalize_locator("").is_err());
    assert!(normalize_locator("/").is_err());
}

#[test]
fn fs_fetcher_resolves_under_root() {
    let f = FsFetcher::new("/srv/site");
    assert_eq!(
        f.resolve("/frames/0001.jpg").unwrap(),
        PathBuf::from("/srv/site/frames/0001.jpg")
    );
}

#[test]
fn fs_fetcher_reads_files_and_reports_missing() {
    let dir = PathBuf::from("target").join("fetch_unit");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("a.bin"), [1u8, 2, 3]).unwrap();

    let f = FsFetcher::new(&dir);
    assert_eq!(f.fetch("a.bin").unwrap(), vec![1, 2, 3]);
    let err = f.fetch("missing.bin").unwrap_err();
    assert!(err.to_string().contains("asset error"));
}

#[test]
fn memory_fetcher_serves_registered_frames() {
    let f = MemoryFetcher::new().with("f0", vec![7]);
    assert_eq!(f.fetch("f0").unwrap(), vec![7]);
    assert!(f.fetch("f1").is_err());
}
