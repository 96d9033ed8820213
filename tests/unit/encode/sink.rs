use std::path::PathBuf;

use super::*;

fn image(name: &str) -> ExportedImage {
    ExportedImage {
        file_name: name.to_owned(),
        width: 1,
        height: 1,
        bytes: vec![1, 2, 3],
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_sinks").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn file_sink_creates_parents() {
    let dir = scratch_dir("to_file");
    let path = dir.join("nested/out.png");
    let mut sink = FileSink::to_file(&path);
    let written = sink.write_image(&image("ignored.png")).unwrap();
    assert_eq!(written, Some(path.clone()));
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
}

#[test]
fn dir_sink_uses_image_file_name() {
    let dir = scratch_dir("into_dir");
    let mut sink = FileSink::into_dir(&dir);
    let written = sink.write_image(&image("4D Chess Image.png")).unwrap();
    assert_eq!(written, Some(dir.join("4D Chess Image.png")));
    assert!(dir.join("4D Chess Image.png").is_file());
}

#[test]
fn no_overwrite_refuses_existing_file() {
    let dir = scratch_dir("no_overwrite");
    let path = dir.join("out.png");
    FileSink::to_file(&path)
        .write_image(&image("a.png"))
        .unwrap();

    let mut sink = FileSink::to_file(&path).overwrite(false);
    let err = sink.write_image(&image("a.png")).unwrap_err();
    assert!(matches!(err, RenderError::Encode(_)));

    let mut sink = FileSink::to_file(&path);
    let mut img = image("a.png");
    img.bytes = vec![9];
    sink.write_image(&img).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![9]);
}

#[test]
fn in_memory_sink_keeps_order() {
    let mut sink = InMemorySink::new();
    assert_eq!(sink.write_image(&image("a.png")).unwrap(), None);
    sink.write_image(&image("b.png")).unwrap();
    let names: Vec<_> = sink.images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, ["a.png", "b.png"]);
}
