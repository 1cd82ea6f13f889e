// tests/repository.rs
//! Repository behaviour against a recording in-memory transport.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use scribeagent::{
    AppError, BlockTree, DatabaseRepository, MaxDepth, NotionApiRepository, NotionId,
    PageRepository,
};
use serde_json::json;

fn id(value: &str) -> NotionId {
    NotionId::new(value).unwrap()
}

fn repository(transport: StubTransport, depth: usize) -> NotionApiRepository<StubTransport> {
    NotionApiRepository::with_max_depth(transport, MaxDepth::new(depth).unwrap())
}

fn preorder_ids(tree: &BlockTree) -> Vec<String> {
    tree.iter_depth_first()
        .map(|node| node.block().id.to_string())
        .collect()
}

#[tokio::test]
async fn follows_cursor_and_keeps_server_order() {
    let transport = StubTransport::new()
        .with_children_page(
            "page",
            None,
            list(vec![paragraph("a", "one", false), paragraph("b", "two", false)], Some("c1")),
        )
        .with_children_page("page", Some("c1"), list(vec![paragraph("c", "three", false)], None));
    let repo = repository(transport, 3);

    let tree = repo.get_page_content(&id("page"), 0).await.unwrap();

    assert_eq!(preorder_ids(&tree), vec!["a", "b", "c"]);
    assert_eq!(
        repo.transport().calls(),
        vec![
            Call::GetBlockChildren {
                id: "page".to_string(),
                cursor: None,
                page_size: 100,
            },
            Call::GetBlockChildren {
                id: "page".to_string(),
                cursor: Some("c1".to_string()),
                page_size: 100,
            },
        ]
    );
}

#[tokio::test]
async fn fetches_children_depth_first() {
    let transport = StubTransport::new()
        .with_children("page", vec![paragraph("a", "A", true), paragraph("b", "B", true)])
        .with_children("a", vec![paragraph("a1", "A1", true)])
        .with_children("a1", vec![paragraph("a1x", "A1x", false)])
        .with_children("b", vec![paragraph("b1", "B1", false)]);
    let repo = repository(transport, 3);

    let tree = repo.get_page_content(&id("page"), 0).await.unwrap();

    assert_eq!(repo.transport().children_requests(), vec!["page", "a", "a1", "b"]);
    assert_eq!(preorder_ids(&tree), vec!["a", "a1", "a1x", "b", "b1"]);
    let depths: Vec<usize> = tree.iter_depth_first().map(|n| n.depth()).collect();
    assert_eq!(depths, vec![0, 1, 2, 0, 1]);
    assert!(tree.truncated().is_empty());
}

#[tokio::test]
async fn stops_descending_at_max_depth() {
    let transport = StubTransport::new()
        .with_children("page", vec![paragraph("a", "A", true), paragraph("b", "B", false)])
        .with_children("a", vec![paragraph("a1", "A1", true)])
        .with_children("a1", vec![paragraph("a1x", "too deep", false)]);
    let repo = repository(transport, 2);

    let tree = repo.get_page_content(&id("page"), 0).await.unwrap();

    assert_eq!(preorder_ids(&tree), vec!["a", "a1", "b"]);
    assert_eq!(repo.transport().children_requests(), vec!["page", "a"]);
    assert_eq!(tree.truncated(), &[id("a1")]);
    assert!(tree.get(&id("a1x")).is_none());
}

#[tokio::test]
async fn zero_depth_fetches_nothing() {
    let transport = StubTransport::new().with_children("page", vec![paragraph("a", "A", false)]);
    let repo = repository(transport, 0);

    let tree = repo.get_page_content(&id("page"), 0).await.unwrap();

    assert!(tree.is_empty());
    assert!(repo.transport().calls().is_empty());
    assert_eq!(tree.truncated(), &[id("page")]);
}

#[tokio::test]
async fn starting_depth_counts_against_the_bound() {
    let transport = StubTransport::new().with_children("page", vec![paragraph("a", "A", false)]);
    let repo = repository(transport, 3);

    assert!(repo.get_page_content(&id("page"), 3).await.unwrap().is_empty());
    assert_eq!(
        preorder_ids(&repo.get_page_content(&id("page"), 2).await.unwrap()),
        vec!["a"]
    );
}

#[tokio::test]
async fn errors_abort_the_whole_fetch() {
    let transport = StubTransport::new()
        .with_children("page", vec![paragraph("a", "A", true), paragraph("b", "B", true)])
        .with_failing_children("a");
    let repo = repository(transport, 3);

    let result = repo.get_page_content(&id("page"), 0).await;

    assert!(matches!(result, Err(AppError::Remote { status: 500, .. })));
    assert_eq!(repo.transport().children_requests(), vec!["page", "a"]);
}

#[tokio::test]
async fn unknown_block_types_do_not_break_the_tree() {
    let transport = StubTransport::new().with_children(
        "page",
        vec![
            generic("x", "some_future_block", false),
            generic("d", "divider", false),
            code("c", "print('hi')", "python"),
        ],
    );
    let repo = repository(transport, 3);

    let tree = repo.get_page_content(&id("page"), 0).await.unwrap();
    let types: Vec<&str> = tree
        .iter_depth_first()
        .map(|n| n.block().block_type.as_str())
        .collect();
    assert_eq!(types, vec!["unsupported", "divider", "code"]);
}

#[tokio::test]
async fn get_page_maps_metadata() {
    let transport = StubTransport::new().with_page("page", page("page", "Project Notes"));
    let repo = repository(transport, 3);

    let fetched = repo.get_page(&id("page")).await.unwrap();
    assert_eq!(fetched.get_title(), "Project Notes");
    assert_eq!(fetched.url, "https://www.notion.so/page");

    let missing = repo.get_page(&id("nope")).await.unwrap_err();
    assert_eq!(missing.remote_status(), Some(404));
}

#[tokio::test]
async fn query_database_paginates_and_forwards_filter() {
    let filter = json!({"filter": {"property": "Done", "checkbox": {"equals": true}}});
    let transport = StubTransport::new()
        .with_database("db", database("db", "Tasks"))
        .with_query_page(
            "db",
            None,
            json!({"results": [page("r1", "First")], "next_cursor": "q2", "has_more": true}),
        )
        .with_query_page(
            "db",
            Some("q2"),
            json!({"results": [page("r2", "Second")], "next_cursor": null, "has_more": false}),
        );
    let repo = repository(transport, 3);

    let database = repo.get_database(&id("db")).await.unwrap();
    assert_eq!(database.get_title(), "Tasks");

    let rows = repo.query_database(&id("db"), Some(&filter)).await.unwrap();
    let titles: Vec<String> = rows.iter().map(|r| r.get_title()).collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let queries: Vec<Call> = repo
        .transport()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::QueryDatabase { .. }))
        .collect();
    assert_eq!(
        queries,
        vec![
            Call::QueryDatabase {
                id: "db".to_string(),
                filter: Some(filter.clone()),
                cursor: None,
            },
            Call::QueryDatabase {
                id: "db".to_string(),
                filter: Some(filter),
                cursor: Some("q2".to_string()),
            },
        ]
    );
}
