//! Schema initialization: every catalog collection enforces its natural key.

use anyhow::Result;
use migration::catalog::RESO_COLLECTIONS;
use reso_seed::error::SeedError;
use reso_seed::repositories::{CollectionRepository, NewDocument};
use reso_seed::schema::{SchemaGap, initialize_schema, verify_schema};
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{doc, setup_empty_db, setup_test_db_arc};

#[tokio::test]
async fn duplicate_keys_are_rejected_in_every_collection() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);

    for spec in RESO_COLLECTIONS {
        let first = NewDocument::unscoped(doc(json!({ spec.key_field: "K-1", "n": 1 })));
        let second = NewDocument::unscoped(doc(json!({ spec.key_field: "K-1", "n": 2 })));

        assert_eq!(repo.insert_many(spec, vec![first]).await?, 1);
        let err = repo
            .insert_many(spec, vec![second])
            .await
            .expect_err("duplicate key must be rejected");
        assert!(
            matches!(&err, SeedError::DuplicateKey { collection, .. } if collection == spec.name),
            "{}: unexpected error {err:?}",
            spec.name
        );
    }
    Ok(())
}

#[tokio::test]
async fn distinct_keys_are_accepted_in_every_collection() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);

    for spec in RESO_COLLECTIONS {
        let docs = vec![
            NewDocument::unscoped(doc(json!({ spec.key_field: "K-1" }))),
            NewDocument::unscoped(doc(json!({ spec.key_field: "K-2" }))),
        ];
        assert_eq!(repo.insert_many(spec, docs).await?, 2, "{}", spec.name);
        assert_eq!(repo.count(spec).await?, 2);
    }
    Ok(())
}

#[tokio::test]
async fn same_key_with_different_scopes_is_accepted() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);
    let spec = CollectionRepository::spec("property")?;

    let docs = ["s1", "s2"]
        .into_iter()
        .map(|scope| NewDocument {
            scope_id: scope.to_string(),
            body: doc(json!({ "ListingKey": "L-1", "sandboxServerId": scope })),
        })
        .collect();
    assert_eq!(repo.insert_many(spec, docs).await?, 2);

    let stored = repo.find_all(spec).await?;
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|d| d.key.as_deref() == Some("L-1")));
    Ok(())
}

#[tokio::test]
async fn numeric_keys_are_stored_as_text() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);
    let spec = CollectionRepository::spec("member")?;

    repo.insert_many(spec, vec![NewDocument::unscoped(doc(json!({ "MemberKey": 42 })))])
        .await?;
    assert_eq!(repo.find_all(spec).await?[0].key.as_deref(), Some("42"));
    Ok(())
}

#[tokio::test]
async fn empty_and_missing_keys_are_stored() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);
    let spec = CollectionRepository::spec("office")?;

    let inserted = repo
        .insert_many(
            spec,
            vec![
                NewDocument::unscoped(doc(json!({ "OfficeKey": "" }))),
                NewDocument::unscoped(doc(json!({ "OfficeName": "No key" }))),
                NewDocument::unscoped(doc(json!({ "OfficeKey": null }))),
            ],
        )
        .await?;
    assert_eq!(inserted, 3);

    let keys: Vec<_> = repo.find_all(spec).await?.into_iter().map(|d| d.key).collect();
    assert_eq!(keys, vec![Some(String::new()), None, None]);
    Ok(())
}

#[tokio::test]
async fn empty_string_key_is_unique_like_any_other() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let repo = CollectionRepository::new(db);
    let spec = CollectionRepository::spec("office")?;

    repo.insert_many(spec, vec![NewDocument::unscoped(doc(json!({ "OfficeKey": "" })))])
        .await?;
    let err = repo
        .insert_many(spec, vec![NewDocument::unscoped(doc(json!({ "OfficeKey": "" })))])
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key());
    Ok(())
}

#[tokio::test]
async fn initialize_schema_is_idempotent_and_complete() -> Result<()> {
    let db = setup_empty_db().await?;

    let before = verify_schema(&db).await?;
    assert_eq!(before.len(), RESO_COLLECTIONS.len());
    assert!(
        before
            .iter()
            .all(|gap| matches!(gap, SchemaGap::MissingCollection(_)))
    );

    let created = initialize_schema(&db).await?;
    assert_eq!(created.len(), RESO_COLLECTIONS.len());
    initialize_schema(&db).await?;

    assert!(verify_schema(&db).await?.is_empty());
    Ok(())
}

#[test]
fn unknown_collection_is_reported() {
    let err = CollectionRepository::spec("lookup_value").unwrap_err();
    assert!(matches!(err, SeedError::UnknownCollection(name) if name == "lookup_value"));
}
