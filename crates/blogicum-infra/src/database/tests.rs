#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use blogicum_core::domain::Post;
    use blogicum_core::pagination::PageRequest;
    use blogicum_core::policy::{ListingScope, Viewer, listing_filter};
    use blogicum_core::ports::{BaseRepository, PostRepository};
    use chrono::{TimeDelta, TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Value};
    use uuid::Uuid;

    use crate::database::entity::{category, post, user};
    use crate::database::postgres_repo::PostgresPostRepository;

    fn post_model(id: Uuid, author_id: Uuid, category_id: Option<Uuid>) -> post::Model {
        let now = Utc::now();
        post::Model {
            id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: (now - TimeDelta::days(1)).into(),
            is_published: true,
            category_id,
            location_id: None,
            created_at: now.into(),
        }
    }

    fn user_model(id: Uuid) -> user::Model {
        let now = Utc::now();
        user::Model {
            id,
            username: "tolstoy".to_owned(),
            first_name: "Lev".to_owned(),
            last_name: "Tolstoy".to_owned(),
            email: "leo@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            is_staff: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn empty_listing() -> PostgresPostRepository {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("num_items", Value::from(0i64))])]])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();
        PostgresPostRepository::new(db)
    }

    fn executed(repo: PostgresPostRepository) -> Vec<Statement> {
        repo.db
            .into_transaction_log()
            .iter()
            .flat_map(|t| t.statements().to_vec())
            .collect()
    }

    /// SQL with the `"posts".` qualifier and identifier quotes removed.
    fn plain(stmt: &Statement) -> String {
        stmt.sql.replace("\"posts\".", "").replace('"', "")
    }

    /// The statement that loads the page rows, as opposed to the count.
    fn page_query(statements: &[Statement]) -> &Statement {
        statements
            .iter()
            .find(|s| s.sql.contains(" LIMIT ") && !s.sql.contains("num_items"))
            .expect("page query should be executed")
    }

    fn where_clause(sql: &str) -> &str {
        let start = sql.find(" WHERE ").expect("statement should have a WHERE clause");
        let end = sql.find(" ORDER BY ").unwrap_or(sql.len());
        &sql[start..end]
    }

    fn count_row(post_id: Uuid, count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("post_id", post_id.into()), ("count", count.into())])
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(post_id, author_id, None)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.expect("post should be found");
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
    }

    #[tokio::test]
    async fn test_find_record_loads_references() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(post_id, author_id, Some(category_id))]])
            .append_query_results([vec![user_model(author_id)]])
            .append_query_results([vec![category::Model {
                id: category_id,
                title: "Travel".to_owned(),
                description: String::new(),
                slug: "travel".to_owned(),
                is_published: false,
                created_at: Utc::now().into(),
            }]])
            .append_query_results([vec![count_row(post_id, 3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let record = repo.find_record(post_id).await.unwrap().unwrap();

        assert_eq!(record.author.username, "tolstoy");
        assert_eq!(record.comment_count, 3);
        let category = record.category.expect("category should be loaded");
        assert_eq!(category.slug, "travel");
        assert!(!category.is_published);
        assert!(record.location.is_none());
    }

    #[tokio::test]
    async fn test_find_record_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.find_record(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_empty_index_is_first_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("num_items", Value::from(0i64))])]])
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let filter = listing_filter(&Viewer::Anonymous, ListingScope::Index, Utc::now());
        let page = repo
            .list(&filter, 10, PageRequest::parse(Some("5")))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.info.number, 1);
        assert_eq!(page.info.num_pages, 1);
    }

    #[tokio::test]
    async fn test_list_hydrates_page() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("num_items", Value::from(1i64))])]])
            .append_query_results([vec![post_model(post_id, author_id, None)]])
            .append_query_results([vec![user_model(author_id)]])
            .append_query_results([Vec::<BTreeMap<&'static str, Value>>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let filter = listing_filter(
            &Viewer::User(author_id),
            ListingScope::Profile(author_id),
            Utc::now(),
        );
        let page = repo.list(&filter, 10, PageRequest::default()).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].post.id, post_id);
        assert_eq!(page.items[0].comment_count, 0);
        assert_eq!(page.info.total_items, 1);
    }

    #[tokio::test]
    async fn test_delete_owned_reports_miss() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let deleted = repo
            .delete_owned(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_update_owned_returns_post_on_match() {
        let author_id = Uuid::new_v4();
        let post: Post = post_model(Uuid::new_v4(), author_id, None).into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let updated = repo.update_owned(post.clone(), author_id).await.unwrap();

        assert_eq!(updated.map(|p| p.id), Some(post.id));
    }

    #[tokio::test]
    async fn test_anonymous_index_sql_applies_visibility_clauses() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let repo = empty_listing();
        let filter = listing_filter(&Viewer::Anonymous, ListingScope::Index, now);
        repo.list(&filter, 10, PageRequest::default()).await.unwrap();

        let statements = executed(repo);
        let page = page_query(&statements);
        let sql = plain(page);

        assert!(sql.contains("LEFT JOIN categories ON category_id = categories.id"));
        assert!(sql.contains(
            "WHERE is_published = $1 AND pub_date <= $2 \
             AND (category_id IS NULL OR categories.is_published = $3)"
        ));
        assert!(sql.contains("ORDER BY pub_date DESC, created_at DESC, id ASC LIMIT $4 OFFSET $5"));

        let values = page.values.as_ref().unwrap();
        assert_eq!(values.0[0], Value::from(true));
        assert_eq!(values.0[1], Value::from(now.fixed_offset()));
        assert_eq!(values.0[2], Value::from(true));
    }

    #[tokio::test]
    async fn test_own_profile_sql_has_no_visibility_clauses() {
        let author_id = Uuid::new_v4();
        let repo = empty_listing();
        let filter = listing_filter(
            &Viewer::User(author_id),
            ListingScope::Profile(author_id),
            Utc::now(),
        );
        repo.list(&filter, 10, PageRequest::default()).await.unwrap();

        let statements = executed(repo);
        let page = page_query(&statements);
        let sql = plain(page);
        let clause = where_clause(&sql);

        assert_eq!(clause, " WHERE author_id = $1");
        assert_eq!(page.values.as_ref().unwrap().0[0], Value::from(author_id));
    }

    #[tokio::test]
    async fn test_stranger_profile_sql_keeps_visibility_clauses() {
        let author_id = Uuid::new_v4();
        let repo = empty_listing();
        let filter = listing_filter(
            &Viewer::User(Uuid::new_v4()),
            ListingScope::Profile(author_id),
            Utc::now(),
        );
        repo.list(&filter, 10, PageRequest::default()).await.unwrap();

        let statements = executed(repo);
        let sql = plain(page_query(&statements));

        assert_eq!(
            where_clause(&sql),
            " WHERE author_id = $1 AND is_published = $2 AND pub_date <= $3 \
             AND (category_id IS NULL OR categories.is_published = $4)"
        );
    }

    #[tokio::test]
    async fn test_delete_owned_sql_is_conditional_on_author() {
        let id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.delete_owned(id, author_id).await.unwrap());

        let statements = executed(repo);
        assert_eq!(statements.len(), 1);
        let sql = plain(&statements[0]);
        assert!(sql.starts_with("DELETE FROM posts"));
        assert_eq!(where_clause(&sql), " WHERE id = $1 AND author_id = $2");
        assert_eq!(
            statements[0].values.as_ref().unwrap().0,
            vec![Value::from(id), Value::from(author_id)]
        );
    }

    #[tokio::test]
    async fn test_update_owned_sql_is_conditional_on_author() {
        let author_id = Uuid::new_v4();
        let post: Post = post_model(Uuid::new_v4(), author_id, None).into();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert!(repo.update_owned(post.clone(), author_id).await.unwrap().is_none());

        let statements = executed(repo);
        assert_eq!(statements.len(), 1);
        let sql = plain(&statements[0]);
        let clause = where_clause(&sql);
        assert!(sql.starts_with("UPDATE posts SET"));
        assert!(clause.starts_with(" WHERE id = $"));
        assert!(clause.contains(" AND author_id = $"));
        // Ownership and creation time are never rewritten.
        let set = &sql[..sql.len() - clause.len()];
        assert!(!set.contains("author_id"));
        assert!(!set.contains("created_at"));

        let values = &statements[0].values.as_ref().unwrap().0;
        assert_eq!(
            values[values.len() - 2..],
            [Value::from(post.id), Value::from(author_id)]
        );
    }
}
