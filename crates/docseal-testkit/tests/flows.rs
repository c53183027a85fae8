//! End-to-end create and update flows.

use docseal::core::{Document, Sha256Hash, StandardCrypto};
use docseal::perms::{
    unwrap_document_key, Action, DocumentKey, FileCipher, ParticipantRecord, ParticipantType,
};
use docseal::{DocError, DocSeal, DocSealConfig, DocumentFile};
use docseal_testkit::{
    multi_party, public_document, sealed_document, workgroup_document, CountingRequester,
    FailingRequester, Party, Workgroup,
};

const BODY: &[u8] = b"This lease is made between the parties below.";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn lease() -> DocumentFile {
    DocumentFile::from_bytes("lease.txt", BODY.to_vec()).with_mime_type("text/plain")
}

fn opened_key(record: &ParticipantRecord, party: &Party) -> DocumentKey {
    let sealed = record.key.as_deref().expect("add carries a key");
    unwrap_document_key(&StandardCrypto, sealed, &party.key, "test").unwrap()
}

fn opens(record: &ParticipantRecord, party: &Party) -> bool {
    let sealed = record.key.as_deref().expect("add carries a key");
    unwrap_document_key(&StandardCrypto, sealed, &party.key, "test").is_ok()
}

#[tokio::test]
async fn test_create_public_document() {
    init_tracing();
    let descriptor = DocSeal::default()
        .create()
        .title("Lease")
        .file(lease())
        .set_public(true)
        .build()
        .await
        .unwrap();

    assert_eq!(descriptor.participants.len(), 1);
    let record = &descriptor.participants[0];
    assert_eq!(record.action, Action::Add);
    assert_eq!(record.kind, ParticipantType::Public);
    assert_eq!(record.id, None);

    let key = DocumentKey::from_hex(record.key.as_deref().unwrap()).unwrap();
    let content = descriptor.content_bytes().unwrap();
    let plaintext = FileCipher::new(&StandardCrypto)
        .decrypt(&content, &key)
        .unwrap();
    assert_eq!(plaintext, BODY);

    let raw = Sha256Hash::hash(BODY);
    assert_eq!(descriptor.raw_hash, raw.to_hex());
    assert_eq!(descriptor.hash, Sha256Hash::hash(raw.as_bytes()).to_hex());
    assert_eq!(descriptor.filename, "lease.txt");
    assert_eq!(descriptor.mime_type, "text/plain");

    let json: serde_json::Value = serde_json::from_str(&descriptor.to_json().unwrap()).unwrap();
    assert_eq!(
        json["participants"],
        serde_json::json!([{"action": "add", "type": "public", "key": key.to_hex()}])
    );
    assert_eq!(json["title"], "Lease");
    assert_eq!(json["description"], "");
}

#[tokio::test]
async fn test_create_requests_key_once_for_many_participants() {
    let owner = Party::new("owner");
    let parties = multi_party(4);
    let requester = CountingRequester::new(owner.key.clone());

    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .create()
        .file(lease())
        .add_signers([parties[0].entity(), parties[1].entity()])
        .add_observers([parties[2].entity()])
        .add_workgroup(parties[3].entity())
        .build()
        .await
        .unwrap();

    assert_eq!(requester.calls(), 1);
    assert_eq!(descriptor.participants.len(), 4);

    let kinds: Vec<_> = descriptor.participants.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParticipantType::Signer,
            ParticipantType::Signer,
            ParticipantType::Observer,
            ParticipantType::Workgroup,
        ]
    );

    let first = opened_key(&descriptor.participants[0], &parties[0]);
    for (i, (record, party)) in descriptor.participants.iter().zip(&parties).enumerate() {
        assert_eq!(record.id.as_ref(), Some(&party.entity.id));
        assert_eq!(opened_key(record, party).as_bytes(), first.as_bytes());
        for (j, other) in parties.iter().enumerate() {
            if i != j {
                assert!(!opens(record, other), "record {i} opened by party {j}");
            }
        }
    }

    let plaintext = FileCipher::new(&StandardCrypto)
        .decrypt(&descriptor.content_bytes().unwrap(), &first)
        .unwrap();
    assert_eq!(plaintext, BODY);
}

#[tokio::test]
async fn test_create_public_only_skips_requester() {
    let requester = CountingRequester::new(Party::new("owner").key);
    DocSeal::default()
        .with_key_requester(requester.clone())
        .create()
        .file(lease())
        .set_public(true)
        .build()
        .await
        .unwrap();
    assert_eq!(requester.calls(), 0);
}

#[tokio::test]
async fn test_create_without_requester_is_illegal_state() {
    let err = DocSeal::default()
        .create()
        .file(lease())
        .add_observer(Party::new("alice").entity())
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, DocError::IllegalState(_)));
}

#[tokio::test]
async fn test_create_requester_failure() {
    let err = DocSeal::default()
        .with_key_requester(FailingRequester::new("user cancelled"))
        .create()
        .file(lease())
        .add_signer(Party::new("alice").entity())
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, DocError::KeyRequest { .. }));
    assert_eq!(err.to_string(), "key request failed for create: user cancelled");
}

#[tokio::test]
async fn test_create_from_path_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.bin");
    std::fs::write(&path, BODY).unwrap();

    let config = DocSealConfig {
        default_mime_type: "application/x-scan".into(),
        ..DocSealConfig::default()
    };
    let descriptor = DocSeal::new(config)
        .create()
        .file(DocumentFile::from_path(&path))
        .set_public(true)
        .build()
        .await
        .unwrap();
    assert_eq!(descriptor.filename, "scan.bin");
    assert_eq!(descriptor.mime_type, "application/x-scan");

    let err = DocSeal::new(DocSealConfig::default().with_max_file_size(8))
        .create()
        .file(DocumentFile::from_path(&path))
        .set_public(true)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, DocError::FileTooLarge { limit: 8, .. }));
}

#[tokio::test]
async fn test_update_replace_observers() {
    init_tracing();
    let owner = Party::new("owner");
    let parties = multi_party(3);
    let (a, b, c) = (&parties[0], &parties[1], &parties[2]);
    let key = DocumentKey::from_bytes([0x5a; 32]);

    let mut original = sealed_document("doc-7", &owner, &key);
    original.observers = vec![a.entity(), b.entity()];

    let requester = CountingRequester::new(owner.key.clone());
    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .update(original)
        .replace_observers(&[b.entity(), c.entity()])
        .build()
        .await
        .unwrap();

    assert_eq!(requester.calls(), 1);
    assert_eq!(descriptor.participants.len(), 2);

    let added = &descriptor.participants[0];
    assert_eq!(added.action, Action::Add);
    assert_eq!(added.kind, ParticipantType::Observer);
    assert_eq!(added.id.as_ref(), Some(&c.entity.id));
    assert_eq!(opened_key(added, c).as_bytes(), key.as_bytes());
    assert!(!opens(added, a));
    assert!(!opens(added, b));

    let removed = &descriptor.participants[1];
    assert_eq!(removed.action, Action::Remove);
    assert_eq!(removed.id.as_ref(), Some(&a.entity.id));
    assert!(removed.key.is_none());

    let json: serde_json::Value = serde_json::from_str(&descriptor.to_json().unwrap()).unwrap();
    assert_eq!(
        json["participants"][1],
        serde_json::json!({"action": "remove", "type": "observer", "id": a.entity.id.as_str()})
    );
    assert!(json.get("title").is_none());
}

#[tokio::test]
async fn test_update_set_public_twice_on_public_document() {
    let requester = CountingRequester::new(Party::new("owner").key);
    let original = public_document("doc-pub", &DocumentKey::from_bytes([1; 32]));

    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .update(original)
        .set_public(true)
        .set_public(true)
        .build()
        .await
        .unwrap();

    assert!(descriptor.participants.is_empty());
    assert_eq!(requester.calls(), 0);
}

#[tokio::test]
async fn test_update_make_private_document_public() {
    let owner = Party::new("owner");
    let key = DocumentKey::from_bytes([0x33; 32]);
    let requester = CountingRequester::new(owner.key.clone());

    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .update(sealed_document("doc-8", &owner, &key))
        .set_public(true)
        .build()
        .await
        .unwrap();

    assert_eq!(requester.calls(), 1);
    assert_eq!(descriptor.participants.len(), 1);
    assert_eq!(descriptor.participants[0].key.as_deref(), Some(key.to_hex().as_str()));
}

#[tokio::test]
async fn test_update_wrong_key_is_decryption_error() {
    let owner = Party::new("owner");
    let stranger = Party::new("stranger");
    let original = sealed_document("doc-9", &owner, &DocumentKey::from_bytes([2; 32]));

    let err = DocSeal::default()
        .with_key_requester(CountingRequester::new(stranger.key.clone()))
        .update(original)
        .add_observer(Party::new("dave").entity())
        .build()
        .await
        .unwrap_err();

    assert!(err.is_decryption());
    assert!(err.to_string().contains("doc-9"));
}

#[tokio::test]
async fn test_update_removals_only_needs_no_requester() {
    let owner = Party::new("owner");
    let workgroup = Workgroup::new("legal", owner.clone());
    let mut original = sealed_document("doc-10", &owner, &DocumentKey::from_bytes([3; 32]));
    original.workgroups = vec![workgroup.entity()];

    let descriptor = DocSeal::default()
        .update(original)
        .replace_workgroups(&[])
        .description("archived")
        .build()
        .await
        .unwrap();

    assert_eq!(descriptor.description.as_deref(), Some("archived"));
    assert_eq!(descriptor.participants.len(), 1);
    assert_eq!(descriptor.participants[0].kind, ParticipantType::Workgroup);
    assert_eq!(descriptor.participants[0].action, Action::Remove);
}

#[tokio::test]
async fn test_decrypt_created_document() {
    let owner = Party::new("owner");
    let seal = DocSeal::default().with_key_requester(CountingRequester::new(owner.key.clone()));

    let descriptor = seal
        .create()
        .file(lease())
        .add_observer(owner.entity())
        .build()
        .await
        .unwrap();

    let stored = Document {
        id: Some("doc-11".into()),
        secret_key: descriptor.participants[0].key.clone().unwrap(),
        raw_hash: Some(descriptor.raw_hash.clone()),
        ..Document::default()
    };
    let mut content = descriptor.content_bytes().unwrap();

    let plaintext = seal.decrypt_file(&stored, &content, &owner.key).unwrap();
    assert_eq!(plaintext, BODY);
    assert_eq!(seal.hash_file(&plaintext), descriptor.raw_hash);

    let signature = seal.sign_raw(&stored, &owner.key).unwrap();
    assert!(seal
        .verify_raw(&stored, &signature, &owner.key.signing_public_key())
        .unwrap());

    content[20] ^= 0x01;
    let err = seal.decrypt_file(&stored, &content, &owner.key).unwrap_err();
    assert!(err.is_invalid_checksum());
}

#[tokio::test]
async fn test_workgroup_document_access() {
    let admin = Party::new("admin");
    let member = Party::new("member");
    let outsider = Party::new("outsider");
    let workgroup = Workgroup::new("finance", admin);
    let key = DocumentKey::from_bytes([0x77; 32]);

    let document = workgroup_document("doc-12", &workgroup, &member, &key);
    let seal = DocSeal::default();

    let resolved = seal.document_key(&document, &member.key).unwrap();
    assert_eq!(resolved.as_bytes(), key.as_bytes());

    let err = seal.document_key(&document, &outsider.key).unwrap_err();
    assert!(err.is_decryption());

    // A member of a different workgroup opens the first layer but not the second.
    let other = Workgroup::new("other", Party::new("admin-2"));
    let mut mismatched = document.clone();
    mismatched.workgroup_key = Some(other.key_for(&member));
    let err = seal.document_key(&mismatched, &member.key).unwrap_err();
    assert!(err.is_decryption());
}

#[tokio::test]
async fn test_update_workgroup_document_add_observer() {
    let admin = Party::new("admin");
    let member = Party::new("member");
    let dave = Party::new("dave");
    let workgroup = Workgroup::new("finance", admin);
    let key = DocumentKey::from_bytes([0x61; 32]);

    let requester = CountingRequester::new(member.key.clone());
    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .update(workgroup_document("doc-13", &workgroup, &member, &key))
        .add_observer(dave.entity())
        .build()
        .await
        .unwrap();

    assert_eq!(requester.calls(), 1);
    assert_eq!(descriptor.participants.len(), 1);
    let added = &descriptor.participants[0];
    assert_eq!(added.id.as_ref(), Some(&dave.entity.id));
    assert_eq!(opened_key(added, &dave).as_bytes(), key.as_bytes());
    assert!(!opens(added, &member));
}

#[tokio::test]
async fn test_update_public_document_add_observer() {
    let owner = Party::new("owner");
    let erin = Party::new("erin");
    let key = DocumentKey::from_bytes([0x62; 32]);

    let requester = CountingRequester::new(owner.key.clone());
    let descriptor = DocSeal::default()
        .with_key_requester(requester.clone())
        .update(public_document("doc-14", &key))
        .add_observer(erin.entity())
        .build()
        .await
        .unwrap();

    assert_eq!(requester.calls(), 1);
    assert_eq!(descriptor.participants.len(), 1);
    let added = &descriptor.participants[0];
    assert_eq!(added.kind, ParticipantType::Observer);
    assert_eq!(opened_key(added, &erin).as_bytes(), key.as_bytes());
    assert!(!opens(added, &owner));
}
