mod common;

use proptest::prelude::*;
use reqwest::StatusCode;
use serde_json::{Value, json};

use bookshelf::schema::current_year;
use common::ApiTestServer;

/// Property test strategies for generating test data
pub mod strategies {
    use super::*;
    use proptest::option;
    use proptest::string::string_regex;

    /// Text without surrounding whitespace, so trimming leaves it unchanged
    pub fn text_strategy(max_inner: usize) -> impl Strategy<Value = String> {
        string_regex(&format!(r"[A-Za-z0-9]([A-Za-z0-9 .,'-]{{0,{max_inner}}}[A-Za-z0-9])?"))
            .unwrap()
    }

    /// Years accepted by the book schema
    pub fn valid_year_strategy() -> impl Strategy<Value = i64> {
        1000..=current_year() + 10
    }

    /// Years rejected by the book schema
    pub fn invalid_year_strategy() -> impl Strategy<Value = i64> {
        prop_oneof![
            -100_000i64..1000,
            (current_year() + 11)..(current_year() + 100_000),
        ]
    }

    /// Strategy for generating valid book request bodies
    pub fn book_strategy() -> impl Strategy<Value = Value> {
        (
            text_strategy(60),
            text_strategy(40),
            option::of(valid_year_strategy()),
            option::of(any::<bool>()),
        )
            .prop_map(|(title, author, year, is_available)| {
                let mut book = json!({"title": title, "author": author});
                if let Some(year) = year {
                    book["year"] = json!(year);
                }
                if let Some(is_available) = is_available {
                    book["isAvailable"] = json!(is_available);
                }
                book
            })
    }

    /// Strategy for generating valid user request bodies
    pub fn user_strategy() -> impl Strategy<Value = Value> {
        (
            text_strategy(30),
            string_regex(r"[a-z][a-z0-9.]{0,15}@[a-z]{1,10}\.(com|org|net)").unwrap(),
            option::of(0i64..130),
        )
            .prop_map(|(name, email, age)| {
                let mut user = json!({"name": name, "email": email});
                if let Some(age) = age {
                    user["age"] = json!(age);
                }
                user
            })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    #[test]
    fn book_creation_roundtrip(book in strategies::book_strategy()) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new().await;

            let created = test_server.create("/books", &book).await;
            prop_assert_eq!(&created["title"], &book["title"]);
            prop_assert_eq!(&created["author"], &book["author"]);
            let expected_year = book.get("year").cloned().unwrap_or(json!(current_year()));
            prop_assert_eq!(&created["year"], &expected_year);
            let expected_available = book.get("isAvailable").cloned().unwrap_or(json!(true));
            prop_assert_eq!(&created["isAvailable"], &expected_available);

            let id = created["id"].as_str().unwrap();
            let response = test_server.server.get(&format!("/books/{}", id)).await;
            response.assert_status_ok();
            let fetched: Value = response.json();
            prop_assert_eq!(&fetched["data"], &created);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn out_of_range_year_is_rejected(
        book in strategies::book_strategy(),
        year in strategies::invalid_year_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new().await;

            let mut invalid = book.clone();
            invalid["year"] = json!(year);

            let response = test_server.server.post("/books").json(&invalid).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            prop_assert_eq!(&body["error"], &json!("Validation error"));

            let created = test_server.create("/books", &book).await;
            let id = created["id"].as_str().unwrap();
            let response = test_server
                .server
                .put(&format!("/books/{}", id))
                .json(&invalid)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);

            let response = test_server.server.get(&format!("/books/{}", id)).await;
            let fetched: Value = response.json();
            prop_assert_eq!(&fetched["data"], &created);

            let response = test_server.server.get("/books").await;
            let list: Value = response.json();
            prop_assert_eq!(list["data"].as_array().unwrap().len(), 1);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn second_user_with_same_email_is_rejected(
        first in strategies::user_strategy(),
        second in strategies::user_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new().await;
            test_server.create("/users", &first).await;

            let mut duplicate = second.clone();
            duplicate["email"] = first["email"].clone();
            let response = test_server.server.post("/users").json(&duplicate).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            prop_assert_eq!(
                body,
                json!({"success": false, "error": "Email already exists"})
            );
            Ok(())
        }).unwrap()
    }

    #[test]
    fn book_deletion_after_creation(book in strategies::book_strategy()) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new().await;

            let created = test_server.create("/books", &book).await;
            let id = created["id"].as_str().unwrap();

            let response = test_server.server.delete(&format!("/books/{}", id)).await;
            response.assert_status(StatusCode::NO_CONTENT);

            let response = test_server.server.get(&format!("/books/{}", id)).await;
            response.assert_status(StatusCode::NOT_FOUND);

            let response = test_server.server.get("/books").await;
            response.assert_status_ok();
            let list: Value = response.json();
            prop_assert!(list["data"].as_array().unwrap().is_empty());
            Ok(())
        }).unwrap()
    }

    #[test]
    fn update_without_title_leaves_book_unchanged(
        book in strategies::book_strategy(),
        author in strategies::text_strategy(40)
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new().await;

            let created = test_server.create("/books", &book).await;
            let id = created["id"].as_str().unwrap();

            let response = test_server
                .server
                .put(&format!("/books/{}", id))
                .json(&json!({"author": author}))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            prop_assert_eq!(&body["error"], &json!("Title and author are required"));

            let response = test_server.server.get(&format!("/books/{}", id)).await;
            let fetched: Value = response.json();
            prop_assert_eq!(&fetched["data"], &created);
            Ok(())
        }).unwrap()
    }
}
