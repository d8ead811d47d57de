use catalog_core::{
    commit::{prepare_commit, FormFields},
    error::Field,
    ids::SequentialIds,
    staged::{LocalFile, StagedImageCollection, Status},
};
use shared::domain::{ImageId, ProductId, ProductImage};

fn seed() -> StagedImageCollection {
    StagedImageCollection::seed_from_existing(
        vec![ProductImage::new("a", "L1"), ProductImage::new("b", "L2")],
        10,
    )
}

fn file(name: &str) -> LocalFile {
    LocalFile::new(name, name.as_bytes().to_vec())
}

fn fields() -> FormFields {
    FormFields::new("Desk lamp", "49.90")
}

fn target() -> ProductId {
    ProductId::from("product-1")
}

#[test]
fn scenario_a_gallery_append_uploads_new_file_only() {
    let mut ids = SequentialIds::new();
    let mut collection = seed();

    let appended = collection.append_gallery_files(vec![file("f1.png")], &mut ids);

    let view = collection.active_view();
    assert_eq!(view.len(), 3);
    assert_eq!(
        view.iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
        vec![ImageId::from("a"), ImageId::from("b"), appended[0].clone()]
    );
    assert_eq!(
        view.iter().map(|e| e.status).collect::<Vec<_>>(),
        vec![Status::Unchanged, Status::Unchanged, Status::NewlyAdded]
    );

    let payload = prepare_commit(&collection, &fields(), Some(&target())).expect("valid");
    assert_eq!(payload.files_to_upload.len(), 1);
    assert_eq!(payload.files_to_upload[0].filename, "f1.png");
    assert!(payload.ids_to_delete.is_empty());
}

#[test]
fn scenario_b_removing_existing_image_schedules_deletion() {
    let mut collection = seed();

    collection
        .mark_or_remove(&ImageId::from("a"))
        .expect("mark a");

    let view: Vec<_> = collection.active_view().iter().map(|e| e.id.clone()).collect();
    assert_eq!(view, vec![ImageId::from("b")]);

    let payload = prepare_commit(&collection, &fields(), Some(&target())).expect("valid");
    assert_eq!(payload.ids_to_delete, vec![ImageId::from("a")]);
    assert!(payload.files_to_upload.is_empty());
}

#[test]
fn scenario_c_replaced_existing_cover_is_dropped_not_deleted() {
    let mut ids = SequentialIds::new();
    let mut collection = seed();

    let change = collection.set_cover(file("f2.png"), &mut ids);

    let view: Vec<_> = collection.active_view().iter().map(|e| e.id.clone()).collect();
    assert_eq!(view, vec![change.id.clone(), ImageId::from("b")]);

    let payload = prepare_commit(&collection, &fields(), Some(&target())).expect("valid");
    assert!(payload.ids_to_delete.is_empty());
    assert_eq!(payload.files_to_upload.len(), 1);
    assert_eq!(payload.files_to_upload[0].filename, "f2.png");
}

#[test]
fn scenario_d_create_without_images_is_rejected() {
    let collection = StagedImageCollection::new(10);

    let errors = prepare_commit(&collection, &fields(), None).expect_err("no images");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.reason_for(Field::Images),
        Some("At least one image is required")
    );
}

#[test]
fn scenario_e_gallery_append_clamps_at_ten() {
    let mut ids = SequentialIds::new();
    let mut collection = StagedImageCollection::seed_from_existing(
        (1..=9).map(|i| ProductImage::new(format!("k{i}"), format!("L{i}"))),
        10,
    );

    let appended = collection.append_gallery_files(
        vec![file("x.png"), file("y.png"), file("z.png")],
        &mut ids,
    );

    assert_eq!(appended.len(), 1);
    assert_eq!(collection.active_view().len(), 10);
    let payload = prepare_commit(&collection, &fields(), None).expect("valid");
    assert_eq!(payload.files_to_upload.len(), 1);
    assert_eq!(payload.files_to_upload[0].filename, "x.png");
}

#[test]
fn removed_local_file_never_reaches_deletions() {
    let mut ids = SequentialIds::new();
    let mut collection = seed();
    let appended = collection.append_gallery_files(vec![file("tmp.png")], &mut ids);

    collection.mark_or_remove(&appended[0]).expect("remove");

    assert!(collection.get(&appended[0]).is_none());
    let payload = prepare_commit(&collection, &fields(), None).expect("valid");
    assert!(payload.ids_to_delete.is_empty());
    assert!(payload.files_to_upload.is_empty());
}
