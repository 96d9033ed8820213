use std::io::Cursor;
use std::path::PathBuf;

use super::*;

fn png_bytes(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_sprites").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_table_maps_seven_kinds_per_side() {
    let table = SpriteTable::default();
    assert_eq!(table.len(), 14);
    assert_eq!(
        table.get(Side::White, PieceKind::King),
        Some("Pieces/64px/KingW.png")
    );
    assert_eq!(
        table.get(Side::Black, PieceKind::Pawn),
        Some("Pieces/64px/PawnB.png")
    );
    assert_eq!(table.get(Side::White, PieceKind::Unicorn), None);
    assert_eq!(table.get(Side::Black, PieceKind::Dragon), None);
    assert_eq!(table.get(Side::White, PieceKind::Other(0)), None);
}

#[test]
fn table_json_uses_numeric_ids() {
    let json = r#"[
        { "color": 0, "type": 8, "path": "fairy/UnicornW.svg" },
        { "color": 1, "type": 2, "path": "KingB.png" }
    ]"#;
    let table = SpriteTable::from_reader(json.as_bytes()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get(Side::White, PieceKind::Unicorn),
        Some("fairy/UnicornW.svg")
    );

    let back = serde_json::to_value(&table).unwrap();
    assert_eq!(back[0]["type"], 8);
    assert_eq!(back[1]["color"], 1);
}

#[test]
fn table_rejects_bad_side() {
    let json = r#"[{ "color": 2, "type": 1, "path": "x.png" }]"#;
    assert!(matches!(
        SpriteTable::from_reader(json.as_bytes()),
        Err(RenderError::Asset(_))
    ));
}

#[test]
fn prepare_reads_every_entry_once() {
    let dir = scratch_dir("prepare_ok");
    std::fs::create_dir_all(dir.join("set")).unwrap();
    std::fs::write(dir.join("set/KingW.png"), png_bytes([255, 0, 0, 255])).unwrap();
    std::fs::write(dir.join("set/KingB.png"), png_bytes([0, 0, 255, 255])).unwrap();

    let mut table = SpriteTable::empty();
    table.insert(Side::White, PieceKind::King, "set/KingW.png");
    table.insert(Side::Black, PieceKind::King, "./set//KingB.png");

    let atlas = SpriteAtlas::prepare(&table, &dir, 32).unwrap();
    assert_eq!(atlas.len(), 2);
    let sprite = atlas.get(Side::White, PieceKind::King).unwrap();
    assert_eq!((sprite.width, sprite.height), (8, 8));
    assert!(atlas.get(Side::White, PieceKind::Queen).is_none());
}

#[test]
fn prepare_fails_on_missing_file() {
    let dir = scratch_dir("prepare_missing");
    let mut table = SpriteTable::empty();
    table.insert(Side::White, PieceKind::Rook, "RookW.png");

    let err = SpriteAtlas::prepare(&table, &dir, 32).unwrap_err();
    assert!(matches!(err, RenderError::Asset(_)));
    assert!(err.to_string().contains("RookW.png"));
}

#[test]
fn prepare_rejects_escaping_paths() {
    let dir = scratch_dir("prepare_escape");
    let mut table = SpriteTable::empty();
    table.insert(Side::White, PieceKind::Rook, "../RookW.png");
    assert!(matches!(
        SpriteAtlas::prepare(&table, &dir, 32),
        Err(RenderError::Asset(_))
    ));

    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
    assert_eq!(normalize_rel_path("a\\b/./c.png").unwrap(), "a/b/c.png");
}

#[test]
fn undecodable_sprite_is_an_asset_error() {
    let mut atlas = SpriteAtlas::empty();
    let err = atlas
        .insert_encoded(Side::White, PieceKind::Pawn, "PawnW.png", b"nope", 32)
        .unwrap_err();
    assert!(matches!(err, RenderError::Asset(_)));
    assert!(atlas.is_empty());
}

#[test]
fn insert_rgba_checks_length() {
    let mut atlas = SpriteAtlas::empty();
    atlas
        .insert_rgba(Side::Black, PieceKind::Knight, 1, 1, vec![1, 2, 3, 255])
        .unwrap();
    assert!(
        atlas
            .insert_rgba(Side::Black, PieceKind::Knight, 2, 2, vec![0; 4])
            .is_err()
    );
    assert!(atlas.get(Side::Black, PieceKind::Knight).is_some());
}
