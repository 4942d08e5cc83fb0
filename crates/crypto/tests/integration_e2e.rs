//! Integration-Tests: vollstaendige Ablaeufe zwischen Alice, Bob und Eve

use std::collections::HashMap;

use securechat_crypto::{
    decrypt_direct, decrypt_direct_bytes, distribute_room_key, encrypt_direct, fingerprint,
    generate_key_pair, generate_room_key, unwrap_room_key, verify_fingerprint,
    wrap_room_key_for_user, CryptoError, EncryptedPayload, KeyStorageManager, MasterKey,
    PasswordKeyDerivation, PasswortEinstellungen, SchluesselSpeicherEinstellungen,
    SecureMessageHandler, SessionKeyManager,
};

fn manager() -> KeyStorageManager {
    KeyStorageManager::new(
        MasterKey::from_bytes([0x5A; 32]),
        &SchluesselSpeicherEinstellungen::default(),
    )
    .unwrap()
}

#[test]
fn alice_an_bob_eve_liest_mit() {
    let alice = generate_key_pair();
    let bob = generate_key_pair();
    let eve = generate_key_pair();

    let payload = encrypt_direct(
        b"hello",
        alice.private_key.as_bytes(),
        bob.public_key.as_bytes(),
    )
    .expect("Verschluesselung fehlgeschlagen");

    let klartext =
        decrypt_direct(&payload, bob.private_key.as_bytes()).expect("Bob muss entschluesseln");
    assert_eq!(klartext, b"hello");

    let result = decrypt_direct(&payload, eve.private_key.as_bytes());
    assert!(matches!(result, Err(CryptoError::Authentifizierung)));
}

#[test]
fn direktnachricht_ueber_speicherformat() {
    let alice = generate_key_pair();
    let bob = generate_key_pair();

    let payload = encrypt_direct(
        "Grüße aus dem Chat".as_bytes(),
        alice.private_key.as_bytes(),
        bob.public_key.as_bytes(),
    )
    .unwrap();

    // So landet der Payload als ein Feld in der Datenbank
    let gespeichert = payload.to_storage_string();
    let geladen = EncryptedPayload::from_storage_string(&gespeichert).unwrap();
    assert_eq!(geladen.sender_public_key, alice.public_key);

    let klartext = decrypt_direct_bytes(&geladen.to_bytes(), bob.private_key.as_bytes()).unwrap();
    assert_eq!(klartext, "Grüße aus dem Chat".as_bytes());
}

#[test]
fn raum_schluessel_einwickeln_ablegen_auswickeln() {
    let admin = generate_key_pair();
    let user = generate_key_pair();
    let room_key = generate_room_key();

    let wrapped = wrap_room_key_for_user(
        room_key.as_bytes(),
        user.public_key.as_bytes(),
        admin.private_key.as_bytes(),
    )
    .unwrap();

    // Mitgliedschaft speichert `encrypted_room_key_for_user`
    let gespeichert = wrapped.to_storage_string();

    let geladen = EncryptedPayload::from_storage_string(&gespeichert).unwrap();
    let unwrapped = unwrap_room_key(&geladen, user.private_key.as_bytes()).unwrap();
    assert_eq!(unwrapped.as_bytes(), room_key.as_bytes());
}

#[test]
fn raum_unterhaltung_mit_verteiltem_schluessel() {
    let admin_pair = generate_key_pair();
    let admin = SecureMessageHandler::new(admin_pair.private_key.clone());
    let mitglied_pair = generate_key_pair();
    let mitglied = SecureMessageHandler::new(mitglied_pair.private_key.clone());

    let room_key = generate_room_key();
    let mut empfaenger = HashMap::new();
    empfaenger.insert("mitglied".to_string(), mitglied_pair.public_key);

    let verteilt =
        distribute_room_key(&room_key, admin_pair.private_key.as_bytes(), &empfaenger).unwrap();

    let payload = EncryptedPayload::from_storage_string(&verteilt["mitglied"]).unwrap();
    let mein_room_key = unwrap_room_key(&payload, mitglied_pair.private_key.as_bytes()).unwrap();

    let nachricht = admin
        .encrypt_room_message("Willkommen im Raum", &room_key)
        .unwrap();
    assert_eq!(
        mitglied
            .decrypt_room_message(&nachricht, &mein_room_key)
            .unwrap(),
        "Willkommen im Raum"
    );
}

#[test]
fn benutzer_registrierung_und_wiederherstellung() {
    let storage = manager();

    let stored = storage.generate_user_keys().unwrap();
    let json = serde_json::to_string(&stored).unwrap();

    // Spaeter: Datensatz aus der Datenbank laden
    let geladen: securechat_crypto::StoredUserKeys = serde_json::from_str(&json).unwrap();
    let pair = storage
        .get_user_keys(
            &geladen.encrypted_private_key,
            &geladen.public_key.to_base64(),
        )
        .unwrap();

    let bob = generate_key_pair();
    let payload = encrypt_direct(
        b"nach dem Neustart",
        bob.private_key.as_bytes(),
        pair.public_key.as_bytes(),
    )
    .unwrap();
    assert_eq!(
        decrypt_direct(&payload, pair.private_key.as_bytes()).unwrap(),
        b"nach dem Neustart"
    );
}

#[test]
fn anderer_master_schluessel_kann_nicht_lesen() {
    let stored = manager().generate_room_key().unwrap();

    let fremd = KeyStorageManager::new(
        MasterKey::from_bytes([0x11; 32]),
        &SchluesselSpeicherEinstellungen::default(),
    )
    .unwrap();
    assert!(matches!(
        fremd.get_room_key(&stored.encrypted_room_key),
        Err(CryptoError::UngueltigesToken)
    ));
}

#[test]
fn fingerprint_vergleich_nach_bundle_austausch() {
    let storage = manager();
    let alice = generate_key_pair();

    let bundle = storage.export_public_key_bundle(&alice.public_key).unwrap();
    let importiert = storage.import_public_key_bundle(&bundle).unwrap();

    // Alice liest ihren Fingerprint am Telefon vor
    let vorgelesen = fingerprint(alice.public_key.as_bytes()).to_lowercase();
    assert!(verify_fingerprint(importiert.as_bytes(), &vorgelesen));
}

#[test]
fn session_schluessel_beider_seiten() {
    let alice = generate_key_pair();
    let bob = generate_key_pair();

    let mut alice_session = SessionKeyManager::new(alice.private_key.clone(), "sitzung-42");
    let mut bob_session = SessionKeyManager::new(bob.private_key.clone(), "sitzung-42");

    let a = alice_session
        .derive_session_key(bob.public_key.as_bytes(), "chat")
        .unwrap();
    let b = bob_session
        .derive_session_key(alice.public_key.as_bytes(), "chat")
        .unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());

    alice_session.clear_session_keys();
    assert!(alice_session
        .get_cached_session_key(bob.public_key.as_bytes(), "chat")
        .is_none());
}

#[test]
fn passwort_versiegelter_schluessel_bei_registrierung() {
    let kdf = PasswordKeyDerivation::new(PasswortEinstellungen {
        argon2_speicher_kib: 1024,
        argon2_iterationen: 1,
        ..Default::default()
    });
    let pair = generate_key_pair();

    let versiegelt = kdf
        .seal_private_key(&pair.private_key, "mein langes passwort")
        .unwrap();
    let geoeffnet = kdf
        .open_private_key(&versiegelt, "mein langes passwort")
        .unwrap();
    assert_eq!(geoeffnet.public_key(), pair.public_key);
}
