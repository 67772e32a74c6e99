//! Card image resolution and caching tests

use card_catalog::core::CardId;
use card_catalog::settings::MemorySettings;
use card_catalog::{CardStore, CatalogError, ImageSize, Result};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);
const BLUE: Rgba<u8> = Rgba([20, 20, 220, 255]);

fn write_png(path: &Path, color: Rgba<u8>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(20, 28, color).save(path).unwrap();
}

/// Store with PNG artwork under `pics`
fn store_with_pics(pics: &Path) -> CardStore {
    let mut store = CardStore::in_memory();
    store.set_image_root_path(pics);
    store.set_image_extension("png");
    store
}

#[test]
fn test_same_width_returns_same_buffer() -> Result<()> {
    let pics = tempfile::tempdir()?;
    write_png(&pics.path().join("LEA/Shivan Dragon.full.png"), RED);

    let mut store = store_with_pics(pics.path());
    let lea = store.resolve_set("LEA");
    let dragon = store.resolve("Shivan Dragon");
    store.add_to_set(dragon, lea);

    let first = store.card_image(dragon, ImageSize::new(100, 140))?;
    let second = store.card_image(dragon, ImageSize::new(100, 140))?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.dimensions(), (100, 140));

    // Another width is another buffer
    let small = store.card_image(dragon, ImageSize::new(50, 70))?;
    assert!(!Arc::ptr_eq(&first, &small));
    assert_eq!(store.card(dragon).image_cache().scaled_len(), 2);
    Ok(())
}

#[test]
fn test_clear_reloads_from_disk() -> Result<()> {
    let pics = tempfile::tempdir()?;
    let path = pics.path().join("LEA/Shivan Dragon.full.png");
    write_png(&path, RED);

    let mut store = store_with_pics(pics.path());
    let lea = store.resolve_set("LEA");
    let dragon = store.resolve("Shivan Dragon");
    store.add_to_set(dragon, lea);

    let before = store.card_image(dragon, ImageSize::new(10, 10))?;
    assert_eq!(*before.get_pixel(5, 5), RED);

    write_png(&path, BLUE);
    let cached = store.card_image(dragon, ImageSize::new(10, 10))?;
    assert_eq!(*cached.get_pixel(5, 5), RED);

    store.clear_image_cache(dragon);
    assert!(store.card(dragon).image_cache().is_empty());
    let after = store.card_image(dragon, ImageSize::new(10, 10))?;
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(*after.get_pixel(5, 5), BLUE);
    Ok(())
}

#[test]
fn test_lowest_sort_key_set_wins() -> Result<()> {
    let pics = tempfile::tempdir()?;
    write_png(&pics.path().join("LEA/Lightning Bolt.full.png"), RED);
    write_png(&pics.path().join("M10/Lightning Bolt.full.png"), BLUE);

    let mut store = store_with_pics(pics.path());
    let lea = store.resolve_set("LEA");
    let m10 = store.resolve_set("M10");
    let bolt = store.resolve("Lightning Bolt");
    store.add_to_set(bolt, lea);
    store.add_to_set(bolt, m10);
    store.set_sort_key(lea, 2)?;
    store.set_sort_key(m10, 1)?;

    let image = store.card_image(bolt, ImageSize::new(8, 8))?;
    assert_eq!(*image.get_pixel(4, 4), BLUE);
    Ok(())
}

#[test]
fn test_disambiguation_suffix_and_corrected_name() -> Result<()> {
    let pics = tempfile::tempdir()?;
    write_png(&pics.path().join("ICE/FireIce1.full.png"), RED);
    write_png(&pics.path().join("LEA/Circle of Protection Red.full.png"), BLUE);

    let mut store = store_with_pics(pics.path());
    let ice = store.resolve_set("ICE");
    let lea = store.resolve_set("LEA");
    let fire_ice = store.resolve("Fire // Ice");
    let cop = store.resolve("Circle of Protection: Red");
    store.add_to_set(fire_ice, ice);
    store.add_to_set(cop, lea);

    assert_eq!(*store.card_image(fire_ice, ImageSize::new(4, 4))?.get_pixel(1, 1), RED);
    assert_eq!(*store.card_image(cop, ImageSize::new(4, 4))?.get_pixel(1, 1), BLUE);
    Ok(())
}

#[test]
fn test_named_card_without_art_is_unavailable() {
    let pics = tempfile::tempdir().unwrap();
    let mut store = store_with_pics(pics.path());
    let lotus = store.resolve("Black Lotus");

    let err = store.card_image(lotus, ImageSize::new(100, 140)).unwrap_err();
    assert!(matches!(err, CatalogError::ImageUnavailable(ref name) if name == "Black Lotus"));
    assert_eq!(store.card(lotus).image_cache().scaled_len(), 0);
}

#[test]
fn test_card_back_uses_back_image() -> Result<()> {
    let pics = tempfile::tempdir()?;
    write_png(&pics.path().join("back.png"), BLUE);

    let mut store = store_with_pics(pics.path());
    let back = store.resolve("");
    assert_eq!(back, CardId::NO_CARD);

    let image = store.card_image(back, ImageSize::new(30, 42))?;
    assert_eq!(image.dimensions(), (30, 42));
    assert_eq!(*image.get_pixel(15, 21), BLUE);
    Ok(())
}

#[test]
fn test_card_back_placeholder_without_back_image() -> Result<()> {
    let pics = tempfile::tempdir()?;
    let mut store = store_with_pics(pics.path());

    let first = store.card_image(CardId::NO_CARD, ImageSize::new(60, 84))?;
    assert_eq!(first.dimensions(), (60, 84));
    let second = store.card_image(CardId::NO_CARD, ImageSize::new(60, 84))?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_image_root_change_clears_every_cache() -> Result<()> {
    let pics = tempfile::tempdir()?;
    let other = tempfile::tempdir()?;
    write_png(&pics.path().join("LEA/Shivan Dragon.full.png"), RED);
    write_png(&pics.path().join("back.png"), RED);
    write_png(&other.path().join("LEA/Shivan Dragon.full.png"), BLUE);

    let mut store = store_with_pics(pics.path());
    let lea = store.resolve_set("LEA");
    let dragon = store.resolve("Shivan Dragon");
    store.add_to_set(dragon, lea);

    store.card_image(dragon, ImageSize::new(10, 10))?;
    store.card_image(CardId::NO_CARD, ImageSize::new(10, 10))?;
    assert!(!store.card(dragon).image_cache().is_empty());

    store.set_image_root_path(other.path());
    assert!(store.card(dragon).image_cache().is_empty());
    assert!(store.card(CardId::NO_CARD).image_cache().is_empty());

    let image = store.card_image(dragon, ImageSize::new(10, 10))?;
    assert_eq!(*image.get_pixel(5, 5), BLUE);
    Ok(())
}

#[test]
fn test_image_root_from_settings() -> Result<()> {
    let pics = tempfile::tempdir()?;
    write_png(&pics.path().join("back.png"), RED);

    let settings = MemorySettings::new()
        .with("paths/pics", pics.path().to_string_lossy())
        .with("paths/picsext", "png");
    let mut store = CardStore::new(Box::new(settings));

    let image = store.card_image(CardId::NO_CARD, ImageSize::new(5, 5))?;
    assert_eq!(*image.get_pixel(2, 2), RED);
    Ok(())
}

#[test]
fn test_zero_size_is_rejected() {
    let mut store = CardStore::in_memory();
    assert!(matches!(
        store.card_image(CardId::NO_CARD, ImageSize::new(0, 10)),
        Err(CatalogError::InvalidImageSize { .. })
    ));
}
