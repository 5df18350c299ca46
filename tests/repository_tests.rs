//! 数据访问层集成测试（需要数据库）

mod common;

use chrono::Utc;
use syncwatch::auth::generate_session_token;
use syncwatch::error::AppError;
use syncwatch::models::session::Session;
use syncwatch::repository::{
    session_repo::SessionRepository,
    user_repo::{UserRepository, MSG_EMAIL_TAKEN, MSG_USERNAME_TAKEN},
};

async fn test_pool() -> sqlx::PgPool {
    let config = common::create_test_config();
    common::setup_test_db(&config).await
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_create_and_find_user() {
    let pool = test_pool().await;
    let repo = UserRepository::new(pool);

    let username = common::unique_username("rc");
    let email = common::unique_email("rc");

    let user = repo.create(&username, &email, "$argon2id$fake").await.unwrap();
    assert_eq!(user.username, username);
    assert!(!user.verified);

    let by_name = repo.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(by_name.id, user.id);

    let by_email = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    // 登录查询同时匹配两列
    let by_either = repo.find_by_username_or_email(&email).await.unwrap().unwrap();
    assert_eq!(by_either.id, user.id);

    // 区分大小写：大写变体不命中
    let miss = repo
        .find_by_username(&username.to_uppercase())
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_unique_violations_map_to_conflict() {
    let pool = test_pool().await;
    let repo = UserRepository::new(pool);

    let username = common::unique_username("uq");
    let email = common::unique_email("uq");
    repo.create(&username, &email, "$argon2id$fake").await.unwrap();

    // 邮箱冲突
    let err = repo
        .create(&common::unique_username("uq2"), &email, "$argon2id$fake")
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, MSG_EMAIL_TAKEN),
        other => panic!("expected Conflict, got {other:?}"),
    }

    // 用户名冲突
    let err = repo
        .create(&username, &common::unique_email("uq3"), "$argon2id$fake")
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, MSG_USERNAME_TAKEN),
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_session_lifecycle() {
    let pool = test_pool().await;

    let username = common::unique_username("sl");
    let user_id = common::create_test_user(
        &pool,
        &username,
        &common::unique_email("sl"),
        "password123",
        true,
    )
    .await
    .unwrap();

    let repo = SessionRepository::new(pool);
    let session = Session {
        token: generate_session_token(),
        user_id,
        created_at: Utc::now(),
    };

    repo.create(&session).await.unwrap();

    // 联表解析返回用户和会话
    let (user, resolved) = repo.resolve(&session.token).await.unwrap().unwrap();
    assert_eq!(user.id, user_id);
    assert_eq!(user.username, username);
    assert_eq!(resolved.token, session.token);

    // 不存在的令牌解析为 None，不是错误
    assert!(repo.resolve("no-such-token").await.unwrap().is_none());

    // 删除返回受影响行数
    assert_eq!(repo.delete(&session.token).await.unwrap(), 1);
    assert_eq!(repo.delete(&session.token).await.unwrap(), 0);
    assert!(repo.resolve(&session.token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_duplicate_token_insert_is_internal_error() {
    let pool = test_pool().await;

    let user_id = common::create_test_user(
        &pool,
        &common::unique_username("dt"),
        &common::unique_email("dt"),
        "password123",
        true,
    )
    .await
    .unwrap();

    let repo = SessionRepository::new(pool);
    let session = Session {
        token: generate_session_token(),
        user_id,
        created_at: Utc::now(),
    };

    repo.create(&session).await.unwrap();

    // 同一令牌二次插入不是覆盖，而是内部错误
    let err = repo.create(&session).await.unwrap_err();
    assert!(matches!(err, AppError::Internal));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_find_usernames_by_ids() {
    let pool = test_pool().await;

    let username_a = common::unique_username("fa");
    let username_b = common::unique_username("fb");
    let id_a = common::create_test_user(&pool, &username_a, &common::unique_email("fa"), "pw123456", true)
        .await
        .unwrap();
    let id_b = common::create_test_user(&pool, &username_b, &common::unique_email("fb"), "pw123456", true)
        .await
        .unwrap();

    let repo = UserRepository::new(pool);
    let unknown = uuid::Uuid::new_v4();

    let pairs = repo
        .find_usernames_by_ids(&[id_a, id_b, unknown])
        .await
        .unwrap();

    assert_eq!(pairs.len(), 2);
    assert!(pairs.contains(&(id_a, username_a)));
    assert!(pairs.contains(&(id_b, username_b)));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_set_verified() {
    let pool = test_pool().await;
    let repo = UserRepository::new(pool);

    let user = repo
        .create(
            &common::unique_username("sv"),
            &common::unique_email("sv"),
            "$argon2id$fake",
        )
        .await
        .unwrap();
    assert!(!user.verified);

    assert!(repo.set_verified(user.id, true).await.unwrap());
    let updated = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(updated.verified);

    // 不存在的用户返回 false
    assert!(!repo.set_verified(uuid::Uuid::new_v4(), true).await.unwrap());
}
