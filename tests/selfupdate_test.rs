use vibezip::selfupdate::{compare_self, content_hash, SelfUpdateStatus};

#[test]
fn test_content_hash_is_sha256_hex() {
    assert_eq!(
        content_hash(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        content_hash(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_identical_content() {
    assert_eq!(compare_self(b"vz 1.0", b"vz 1.0"), SelfUpdateStatus::Identical);
}

#[test]
fn test_different_content() {
    match compare_self(b"vz 1.0", b"vz 1.1") {
        SelfUpdateStatus::UpdateAvailable { local_hash, remote_hash } => {
            assert_eq!(local_hash, content_hash(b"vz 1.0"));
            assert_eq!(remote_hash, content_hash(b"vz 1.1"));
        }
        SelfUpdateStatus::Identical => panic!("Expected UpdateAvailable"),
    }
}
