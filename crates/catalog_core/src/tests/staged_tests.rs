use super::*;

use crate::ids::SequentialIds;

fn file(name: &str) -> LocalFile {
    LocalFile::new(name, name.as_bytes().to_vec())
}

fn seeded() -> StagedImageCollection {
    StagedImageCollection::seed_from_existing(
        vec![ProductImage::new("a", "L1"), ProductImage::new("b", "L2")],
        10,
    )
}

fn active_ids(collection: &StagedImageCollection) -> Vec<&str> {
    collection
        .active_view()
        .into_iter()
        .map(|entry| entry.id.as_str())
        .collect()
}

#[test]
fn seeding_keeps_input_order_and_marks_unchanged() {
    let collection = seeded();
    assert_eq!(active_ids(&collection), vec!["a", "b"]);
    assert!(collection
        .entries()
        .iter()
        .all(|entry| entry.status == Status::Unchanged && !entry.is_local()));
    assert_eq!(collection.cover().map(|e| e.id.as_str()), Some("a"));
    assert_eq!(collection.remaining_capacity(), 8);
}

#[test]
fn seeding_more_than_capacity_is_truncated() {
    let images = (0..12).map(|i| ProductImage::new(format!("k{i}"), format!("L{i}")));
    let collection = StagedImageCollection::seed_from_existing(images, 10);
    assert_eq!(collection.active_count(), 10);
    assert_eq!(collection.remaining_capacity(), 0);
}

#[test]
fn local_file_guesses_mime_from_extension() {
    assert_eq!(file("cover.jpg").mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(file("shot.png").mime_type.as_deref(), Some("image/png"));
    assert_eq!(file("notes").mime_type, None);
}

#[test]
fn local_file_reads_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("photo.png");
    std::fs::write(&path, b"\x89PNG").expect("write");

    let loaded = LocalFile::from_path(&path).expect("load");
    assert_eq!(loaded.filename, "photo.png");
    assert_eq!(&*loaded.content, b"\x89PNG");

    let err = LocalFile::from_path(&dir.path().join("missing.png")).expect_err("missing");
    assert!(err.to_string().contains("missing.png"));
}

#[test]
fn set_cover_replaces_first_active_entry() {
    let mut ids = SequentialIds::new();
    let mut collection = seeded();

    let change = collection.set_cover(file("new.png"), &mut ids);

    assert_eq!(change.id.as_str(), "local-1");
    assert_eq!(change.displaced.map(|e| e.id), Some(ImageId::from("a")));
    assert_eq!(active_ids(&collection), vec!["local-1", "b"]);
    assert!(collection.get(&ImageId::from("a")).is_none());
}

#[test]
fn set_cover_skips_entries_marked_for_deletion() {
    let mut ids = SequentialIds::new();
    let mut collection = seeded();
    collection
        .mark_or_remove(&ImageId::from("a"))
        .expect("mark a");

    let change = collection.set_cover(file("new.png"), &mut ids);

    assert_eq!(change.displaced.map(|e| e.id), Some(ImageId::from("b")));
    assert_eq!(active_ids(&collection), vec!["local-1"]);
    assert_eq!(
        collection.get(&ImageId::from("a")).map(|e| e.status),
        Some(Status::MarkedForDeletion)
    );
}

#[test]
fn set_cover_on_empty_collection_inserts() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::new(10);

    let change = collection.set_cover(file("first.png"), &mut ids);

    assert!(change.displaced.is_none());
    assert_eq!(active_ids(&collection), vec!["local-1"]);
    assert!(collection.gallery().is_empty());
}

#[test]
fn set_cover_on_full_collection_keeps_count() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::new(10);
    collection.append_gallery_files((0..10).map(|i| file(&format!("{i}.png"))), &mut ids);

    collection.set_cover(file("cover.png"), &mut ids);

    assert_eq!(collection.active_count(), 10);
    assert_eq!(collection.cover().map(|e| e.id.as_str()), Some("local-11"));
}

#[test]
fn gallery_append_is_clamped_to_capacity() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::seed_from_existing(
        (0..9).map(|i| ProductImage::new(format!("k{i}"), format!("L{i}"))),
        10,
    );

    let appended = collection.append_gallery_files(
        vec![file("1.png"), file("2.png"), file("3.png")],
        &mut ids,
    );

    assert_eq!(appended, vec![ImageId::from("local-1")]);
    assert_eq!(collection.active_count(), 10);
    assert_eq!(collection.remaining_capacity(), 0);
}

#[test]
fn marked_entries_free_capacity() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::seed_from_existing(
        (0..10).map(|i| ProductImage::new(format!("k{i}"), format!("L{i}"))),
        10,
    );
    collection
        .mark_or_remove(&ImageId::from("k3"))
        .expect("mark");

    let appended = collection.append_gallery_files(vec![file("x.png")], &mut ids);

    assert_eq!(appended.len(), 1);
    assert_eq!(collection.entries().len(), 11);
    assert_eq!(collection.active_count(), 10);
}

#[test]
fn removing_local_entry_drops_it_from_sequence() {
    let mut ids = SequentialIds::new();
    let mut collection = seeded();
    let appended = collection.append_gallery_files(vec![file("x.png")], &mut ids);

    let removal = collection.mark_or_remove(&appended[0]).expect("remove");

    assert!(matches!(removal, Removal::Discarded(entry) if entry.id == appended[0]));
    assert_eq!(collection.entries().len(), 2);
    assert_eq!(active_ids(&collection), vec!["a", "b"]);
}

#[test]
fn removing_existing_entry_marks_and_hides_it() {
    let mut collection = seeded();

    let removal = collection
        .mark_or_remove(&ImageId::from("a"))
        .expect("mark");

    assert_eq!(removal, Removal::MarkedForDeletion);
    assert_eq!(active_ids(&collection), vec!["b"]);
    assert_eq!(collection.entries().len(), 2);
    assert_eq!(collection.cover().map(|e| e.id.as_str()), Some("b"));

    let again = collection
        .mark_or_remove(&ImageId::from("a"))
        .expect("second mark");
    assert_eq!(again, Removal::AlreadyMarked);
}

#[test]
fn removing_unknown_id_is_not_found() {
    let mut collection = seeded();
    let err = collection
        .mark_or_remove(&ImageId::from("zzz"))
        .expect_err("unknown id");
    assert_eq!(err, StagedError::NotFound(ImageId::from("zzz")));
    assert_eq!(active_ids(&collection), vec!["a", "b"]);
}

#[test]
fn removing_cover_promotes_next_without_touching_rest() {
    let mut ids = SequentialIds::new();
    let mut collection = seeded();
    collection.append_gallery_files(vec![file("x.png"), file("y.png")], &mut ids);
    assert_eq!(collection.gallery().len(), 3);

    collection
        .mark_or_remove(&ImageId::from("a"))
        .expect("mark");

    assert_eq!(collection.cover().map(|e| e.id.as_str()), Some("b"));
    assert_eq!(collection.gallery().len(), 2);
}

#[test]
fn active_view_never_exceeds_capacity_under_mixed_edits() {
    let mut ids = SequentialIds::new();
    let mut collection = seeded();

    for round in 0..20 {
        let batch = (0..round % 4 + 1).map(|i| file(&format!("{round}-{i}.png")));
        collection.append_gallery_files(batch, &mut ids);
        if round % 3 == 0 {
            collection.set_cover(file(&format!("cover-{round}.png")), &mut ids);
        }
        if round % 2 == 0 {
            let victim = collection.gallery().first().map(|entry| entry.id.clone());
            if let Some(victim) = victim {
                collection.mark_or_remove(&victim).expect("remove");
            }
        }
        assert!(collection.active_view().len() <= 10);
    }
}

#[test]
fn zero_limit_still_holds_a_cover() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::new(0);

    let change = collection.set_cover(file("c.png"), &mut ids);

    assert_eq!(active_ids(&collection), vec![change.id.as_str()]);
    assert_eq!(collection.remaining_capacity(), 0);
    assert!(collection
        .append_gallery_files(vec![file("g.png")], &mut ids)
        .is_empty());
}

#[test]
fn limits_above_ten_are_capped() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::new(15);

    let appended =
        collection.append_gallery_files((0..15).map(|i| file(&format!("{i}.png"))), &mut ids);

    assert_eq!(appended.len(), MAX_IMAGES);
    assert_eq!(collection.active_count(), 10);

    let seeded = StagedImageCollection::seed_from_existing(
        (0..15).map(|i| ProductImage::new(format!("k{i}"), format!("L{i}"))),
        15,
    );
    assert_eq!(seeded.active_count(), 10);
}
