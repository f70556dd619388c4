//! The checked-in artifact must stay in sync with its descriptor.
use std::path::Path;

use proto_static::driver;

#[test]
fn person_artifact_is_in_sync_with_its_descriptor() {
    let artifact = driver::generate_file(Path::new("demos/person.schema.json")).unwrap();
    assert_eq!(artifact.file_name, "person.schema.rs");
    assert_eq!(artifact.source, include_str!("gen/person.schema.rs"));
}

#[test]
fn contacts_descriptor_generates_cleanly() {
    let artifact = driver::generate_file(Path::new("demos/contacts.schema.json")).unwrap();
    assert_eq!(artifact.file_name, "contacts.schema.rs");
    assert!(artifact.source.contains("pub struct Contact<"));
    assert!(artifact.source.contains("pub home: Option<Address<"));
}
