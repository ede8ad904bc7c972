//! Integration tests for the Diesel repositories against PostgreSQL.
//!
//! Runs only when `YA_TEST_DATABASE_URL` points at a disposable database;
//! otherwise each test prints a skip marker and returns. Migrations are
//! applied on first use. Rows are keyed by fresh UUIDs and slugs, so suites
//! may share one database.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use uuid::Uuid;
use ya_backend::domain::ports::{
    CommentRepository, NewsRepository, NoteRepository, NoteRepositoryError, UserPersistenceError,
    UserRepository,
};
use ya_backend::domain::{
    CommentDraft, CommentText, NewsDraft, NoteDraft, Slug, User, UserId, Username,
};
use ya_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselNewsRepository, DieselNoteRepository,
    DieselUserRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "YA_TEST_DATABASE_URL";

static MIGRATED: OnceLock<Result<(), String>> = OnceLock::new();

/// Pool for the test database, or `None` when no database is configured.
async fn test_pool() -> Option<DbPool> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("SKIP-TEST-DATABASE: {DATABASE_URL_ENV} is not set");
        return None;
    };
    let migrated = MIGRATED.get_or_init(|| {
        run_pending_migrations(&url)
            .map(|_| ())
            .map_err(|err| err.to_string())
    });
    if let Err(err) = migrated {
        panic!("migrations failed: {err}");
    }
    let config = PoolConfig::new(url).with_max_size(2).with_min_idle(Some(1));
    Some(DbPool::new(config).await.expect("database pool"))
}

async fn insert_user(pool: &DbPool) -> User {
    let user = User::new(
        UserId::random(),
        Username::new(format!("user-{}", Uuid::new_v4())).expect("username"),
    );
    DieselUserRepository::new(pool.clone())
        .insert(&user, "!")
        .await
        .expect("insert user");
    user
}

fn unique_slug() -> Slug {
    Slug::new(format!("slug-{}", Uuid::new_v4().simple())).expect("slug")
}

#[rstest]
#[tokio::test]
async fn users_are_found_by_username_and_unique() {
    let Some(pool) = test_pool().await else { return };
    let repo = DieselUserRepository::new(pool.clone());
    let user = insert_user(&pool).await;

    let stored = repo
        .find_by_username(user.username())
        .await
        .expect("lookup")
        .expect("stored user");
    assert_eq!(stored.user, user);
    assert_eq!(stored.password_hash, "!");

    let clash = User::new(UserId::random(), user.username().clone());
    let error = repo.insert(&clash, "!").await.expect_err("duplicate username");
    assert!(matches!(
        error,
        UserPersistenceError::DuplicateUsername { .. }
    ));
}

#[rstest]
#[tokio::test]
async fn note_slugs_are_unique_across_authors() {
    let Some(pool) = test_pool().await else { return };
    let repo = DieselNoteRepository::new(pool.clone());
    let first = insert_user(&pool).await;
    let second = insert_user(&pool).await;
    let slug = unique_slug();
    let draft = |author: &User| NoteDraft {
        title: "Заголовок".to_owned(),
        text: "Текст".to_owned(),
        slug: slug.clone(),
        author: *author.id(),
    };

    let note = repo.insert(&draft(&first)).await.expect("first insert");
    let error = repo
        .insert(&draft(&second))
        .await
        .expect_err("slug is global");

    assert_eq!(error, NoteRepositoryError::duplicate_slug(slug.as_str()));
    assert!(repo.slug_exists(&slug, None).await.expect("exists"));
    assert!(!repo.slug_exists(&slug, Some(note.id())).await.expect("exists"));
    assert_eq!(
        repo.list_for_author(second.id()).await.expect("list"),
        Vec::new()
    );
}

#[rstest]
#[tokio::test]
async fn notes_update_and_delete_by_id() {
    let Some(pool) = test_pool().await else { return };
    let repo = DieselNoteRepository::new(pool.clone());
    let author = insert_user(&pool).await;
    let note = repo
        .insert(&NoteDraft {
            title: "Было".to_owned(),
            text: "Текст".to_owned(),
            slug: unique_slug(),
            author: *author.id(),
        })
        .await
        .expect("insert");

    let renamed = unique_slug();
    let updated = repo
        .update(
            note.id(),
            &NoteDraft {
                title: "Стало".to_owned(),
                text: "Новый текст".to_owned(),
                slug: renamed.clone(),
                author: *author.id(),
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.title(), "Стало");
    assert_eq!(
        repo.find_by_slug(&renamed).await.expect("find"),
        Some(updated)
    );

    repo.delete(note.id()).await.expect("delete");
    assert!(repo.find_by_slug(&renamed).await.expect("find").is_none());
    assert!(matches!(
        repo.delete(note.id()).await,
        Err(NoteRepositoryError::Missing { .. })
    ));
}

#[rstest]
#[tokio::test]
async fn comments_follow_their_news_item_in_creation_order() {
    let Some(pool) = test_pool().await else { return };
    let news_repo = DieselNewsRepository::new(pool.clone());
    let comments = DieselCommentRepository::new(pool.clone());
    let author = insert_user(&pool).await;
    let news = news_repo
        .insert(&NewsDraft {
            title: "Новость".to_owned(),
            text: "Текст".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 10, 19),
        })
        .await
        .expect("insert news");
    let epoch = Utc
        .with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
        .single()
        .expect("timestamp");

    for hours in [2, 0, 1] {
        comments
            .insert(&CommentDraft {
                news: news.id(),
                author: *author.id(),
                text: CommentText::new(&format!("Комментарий {hours}")).expect("text"),
                created: epoch + Duration::hours(hours),
            })
            .await
            .expect("insert comment");
    }

    let listed = comments.list_for_news(news.id()).await.expect("list");
    let created: Vec<_> = listed.iter().map(|c| c.created()).collect();
    assert_eq!(
        created,
        vec![epoch, epoch + Duration::hours(1), epoch + Duration::hours(2)]
    );

    let edited = comments
        .update_text(listed[0].id(), &CommentText::new("Исправлено").expect("text"))
        .await
        .expect("update");
    assert_eq!(edited.text().as_str(), "Исправлено");
    assert_eq!(edited.created(), epoch);

    comments.delete(listed[0].id()).await.expect("delete");
    assert!(
        comments
            .find_by_id(listed[0].id())
            .await
            .expect("find")
            .is_none()
    );
    assert_eq!(
        news_repo.find_by_id(news.id()).await.expect("find"),
        Some(news)
    );
}
