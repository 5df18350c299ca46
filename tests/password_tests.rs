//! 密码哈希功能单元测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use syncwatch::auth::PasswordHasher;

#[test]
fn test_password_hash_and_verify() {
    let hasher = PasswordHasher::new();
    let password = "correct horse battery staple";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 哈希值应该是 Argon2id 的 PHC 字符串
    assert!(hash.starts_with("$argon2id$"));

    // 验证正确密码
    assert!(hasher.verify(password, &hash).expect("Verification should succeed"));
}

#[test]
fn test_password_verify_with_wrong_password() {
    let hasher = PasswordHasher::new();
    let password = "correct horse battery staple";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 密码不匹配不是错误，而是 Ok(false)
    let matched = hasher
        .verify("wrong horse battery staple", &hash)
        .expect("Verification should complete");
    assert!(!matched, "Wrong password should not match");
}

#[test]
fn test_password_hash_different_each_time() {
    let hasher = PasswordHasher::new();
    let password = "repeatable-password-1";

    let hash1 = hasher.hash(password).expect("First hash should succeed");
    let hash2 = hasher.hash(password).expect("Second hash should succeed");

    // 由于随机盐，每次生成的哈希应该不同
    assert_ne!(hash1, hash2, "Hashes should differ due to salt");

    // 但两个哈希都应该能验证同一个密码
    assert!(hasher.verify(password, &hash1).unwrap());
    assert!(hasher.verify(password, &hash2).unwrap());
}

#[test]
fn test_password_hash_unicode() {
    let hasher = PasswordHasher::new();
    let password = "密码测试pass123🔒";

    let hash = hasher.hash(password).expect("Unicode password should hash");

    assert!(hasher.verify(password, &hash).unwrap());

    // 少一个字符的 Unicode 密码应该不匹配
    assert!(!hasher.verify("密码测试pass123", &hash).unwrap());
}

#[test]
fn test_password_hash_long_password() {
    let hasher = PasswordHasher::new();
    let password = "a".repeat(64);

    let hash = hasher.hash(&password).expect("Long password should hash");

    assert!(hasher.verify(&password, &hash).unwrap());
    assert!(!hasher.verify(&"a".repeat(63), &hash).unwrap());
}

#[test]
fn test_password_verify_with_malformed_hash() {
    let hasher = PasswordHasher::new();

    // 存储的哈希损坏属于内部错误，而不是"密码不匹配"
    assert!(hasher.verify("whatever", "not-a-phc-string").is_err());
    assert!(hasher.verify("whatever", "").is_err());
    assert!(hasher.verify("whatever", "$argon2id$v=19$invalid").is_err());
}

#[test]
fn test_password_hasher_default() {
    let hasher1 = PasswordHasher::default();
    let hasher2 = PasswordHasher::new();

    let password = "default-hasher-pass";
    let hash1 = hasher1.hash(password).unwrap();
    let hash2 = hasher2.hash(password).unwrap();

    assert_ne!(hash1, hash2);
    assert!(hasher1.verify(password, &hash2).unwrap());
    assert!(hasher2.verify(password, &hash1).unwrap());
}
