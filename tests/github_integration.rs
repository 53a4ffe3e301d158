//! Integration tests for the GitHub Git Data client and the commit pipeline.
//!
//! These tests run `GitHubGitData` against a local wiremock server, so the
//! exact requests (paths, headers, bodies, order) can be asserted without
//! touching api.github.com.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use leethub::core::stats::Stats;
use leethub::core::types::{BranchName, RepoSlug};
use leethub::engine::{commit_solution_files, CommitError, CommitRequest, SolutionFile, Stage};
use leethub::forge::github::{encode_content, GitHubGitData};
use leethub::forge::{FileEntry, ForgeError, GitDataApi};
use leethub::store::{MemoryStore, Store, STATS_KEY, TOKEN_KEY};

const TOKEN: &str = "ghp_test_token";
const REPO_PREFIX: &str = "/repos/octocat/solutions/git";

// =============================================================================
// Fixtures
// =============================================================================

fn repo() -> RepoSlug {
    RepoSlug::parse("octocat/solutions").unwrap()
}

fn main_branch() -> BranchName {
    BranchName::new("main").unwrap()
}

fn client(server: &MockServer) -> GitHubGitData {
    GitHubGitData::with_api_base(server.uri())
}

fn authed_store() -> MemoryStore {
    MemoryStore::with_values([(TOKEN_KEY, json!(TOKEN))])
}

fn request(files: Vec<SolutionFile>) -> CommitRequest {
    CommitRequest {
        repo: repo(),
        branch: main_branch(),
        problem: "two-sum".to_string(),
        directory: "0001-two-sum".to_string(),
        files,
        difficulty: Some("Easy".to_string()),
        message: None,
    }
}

fn ref_body(sha: &str) -> Value {
    json!({
        "ref": "refs/heads/main",
        "node_id": "REF_1",
        "url": "https://api.github.com/repos/octocat/solutions/git/refs/heads/main",
        "object": { "type": "commit", "sha": sha, "url": "" }
    })
}

/// Mount the six endpoints of a successful run.
///
/// Tip `tip000`, base tree `tree000`, blobs `blob-a`/`blob-b` (by content),
/// new tree `tree001`, new commit `commit001`.
async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{REPO_PREFIX}/ref/heads/main")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("tip000")))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO_PREFIX}/blobs")))
        .and(body_partial_json(json!({ "content": encode_content("# Two Sum") })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "blob-a", "url": "" })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO_PREFIX}/blobs")))
        .and(body_partial_json(json!({ "content": encode_content("print(1)") })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "blob-b", "url": "" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{REPO_PREFIX}/commits/tip000")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "tip000",
            "message": "Initial commit",
            "tree": { "sha": "tree000", "url": "" },
            "parents": []
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO_PREFIX}/trees")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "tree001", "tree": [] })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO_PREFIX}/commits")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sha": "commit001",
            "tree": { "sha": "tree001" },
            "parents": [{ "sha": "tip000" }]
        })))
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{REPO_PREFIX}/refs/heads/main")))
        .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("commit001")))
        .mount(server)
        .await;
}

fn two_files() -> Vec<SolutionFile> {
    vec![
        SolutionFile::new("README.md", "# Two Sum"),
        SolutionFile::new("solution.py", "print(1)"),
    ]
}

async fn received(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

fn summary(requests: &[Request]) -> Vec<String> {
    requests
        .iter()
        .map(|r| format!("{} {}", r.method.as_str(), r.url.path()))
        .collect()
}

fn body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

// =============================================================================
// Full pipeline
// =============================================================================

mod pipeline {
    use super::*;

    #[tokio::test]
    async fn commits_files_and_records_stats() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        let api = client(&server);
        let store = authed_store();

        let sha = commit_solution_files(&api, &store, &request(two_files()))
            .await
            .unwrap();
        assert_eq!(sha, "commit001");

        let requests = received(&server).await;
        assert_eq!(
            summary(&requests),
            vec![
                format!("GET {REPO_PREFIX}/ref/heads/main"),
                format!("POST {REPO_PREFIX}/blobs"),
                format!("POST {REPO_PREFIX}/blobs"),
                format!("GET {REPO_PREFIX}/commits/tip000"),
                format!("POST {REPO_PREFIX}/trees"),
                format!("POST {REPO_PREFIX}/commits"),
                format!("PATCH {REPO_PREFIX}/refs/heads/main"),
            ]
        );

        let stats = Stats::load(&store).unwrap();
        let record = stats.get("two-sum").unwrap();
        assert_eq!(record.last_commit_sha.as_deref(), Some("commit001"));
        assert_eq!(record.difficulty.as_deref(), Some("Easy"));
    }

    #[tokio::test]
    async fn request_bodies_link_tip_tree_and_commit() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        let api = client(&server);

        commit_solution_files(&api, &authed_store(), &request(two_files()))
            .await
            .unwrap();

        let requests = received(&server).await;

        assert_eq!(
            body(&requests[1]),
            json!({ "content": encode_content("# Two Sum"), "encoding": "base64" })
        );

        assert_eq!(
            body(&requests[4]),
            json!({
                "base_tree": "tree000",
                "tree": [
                    { "path": "0001-two-sum/README.md", "mode": "100644", "type": "blob", "sha": "blob-a" },
                    { "path": "0001-two-sum/solution.py", "mode": "100644", "type": "blob", "sha": "blob-b" }
                ]
            })
        );

        assert_eq!(
            body(&requests[5]),
            json!({ "message": "Add two-sum (Easy)", "tree": "tree001", "parents": ["tip000"] })
        );

        assert_eq!(
            body(&requests[6]),
            json!({ "sha": "commit001", "force": false })
        );
    }

    #[tokio::test]
    async fn every_request_carries_token_header() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;

        commit_solution_files(&client(&server), &authed_store(), &request(two_files()))
            .await
            .unwrap();

        let requests = received(&server).await;
        assert_eq!(requests.len(), 7);
        for r in &requests {
            let auth = r.headers.get("authorization").unwrap().to_str().unwrap();
            assert_eq!(auth, format!("token {TOKEN}"));
            assert!(r.headers.get("user-agent").is_some());
        }
    }

    #[tokio::test]
    async fn missing_token_sends_nothing() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        let store = MemoryStore::new();

        let err = commit_solution_files(&client(&server), &store, &request(two_files()))
            .await
            .unwrap_err();

        assert!(matches!(err, CommitError::MissingCredential));
        assert!(received(&server).await.is_empty());
        assert!(!store.exists(STATS_KEY).unwrap());
    }

    #[tokio::test]
    async fn rejected_ref_update_leaves_stats_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("{REPO_PREFIX}/refs/heads/main")))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Update is not a fast forward" })),
            )
            .with_priority(1)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;
        let store = authed_store();

        let err = commit_solution_files(&client(&server), &store, &request(two_files()))
            .await
            .unwrap_err();

        match err {
            CommitError::Remote { stage, source } => {
                assert_eq!(stage, Stage::UpdateRef);
                assert_eq!(
                    source,
                    ForgeError::ApiError {
                        status: 422,
                        message: "Update is not a fast forward".into()
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!store.exists(STATS_KEY).unwrap());
    }

    #[tokio::test]
    async fn slow_ref_read_times_out_as_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/main")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ref_body("tip"))
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let api = GitHubGitData::with_timeout(server.uri(), std::time::Duration::from_millis(200))
            .unwrap();
        let store = authed_store();

        let err = commit_solution_files(&api, &store, &request(two_files()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommitError::Remote {
                stage: Stage::ReadRef,
                source: ForgeError::NetworkError(_)
            }
        ));
        assert!(!store.exists(STATS_KEY).unwrap());
    }

    #[tokio::test]
    async fn blob_failure_stops_before_tree() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{REPO_PREFIX}/blobs")))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "message": "Bad Gateway" })))
            .with_priority(1)
            .mount(&server)
            .await;
        mount_happy_path(&server).await;

        let err = commit_solution_files(&client(&server), &authed_store(), &request(two_files()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommitError::Remote {
                stage: Stage::CreateBlob,
                source: ForgeError::ApiError { status: 502, .. }
            }
        ));
        assert_eq!(
            summary(&received(&server).await),
            vec![
                format!("GET {REPO_PREFIX}/ref/heads/main"),
                format!("POST {REPO_PREFIX}/blobs"),
            ]
        );
    }
}

// =============================================================================
// Individual endpoints
// =============================================================================

mod endpoints {
    use super::*;

    #[tokio::test]
    async fn get_branch_sha_reads_object_sha() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/solutions")))
            .and(header("authorization", format!("token {TOKEN}").as_str()))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("abc123")))
            .expect(1)
            .mount(&server)
            .await;

        let sha = client(&server)
            .get_branch_sha(&repo(), &BranchName::new("solutions").unwrap(), TOKEN)
            .await
            .unwrap();
        assert_eq!(sha, "abc123");
    }

    #[tokio::test]
    async fn branch_with_hash_is_escaped_in_both_urls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/fix%231")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("fix1-tip")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("{REPO_PREFIX}/refs/heads/fix%231")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("c1")))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let branch = BranchName::new("fix#1").unwrap();
        let sha = api.get_branch_sha(&repo(), &branch, TOKEN).await.unwrap();
        assert_eq!(sha, "fix1-tip");
        api.update_branch(&repo(), &branch, "c1", TOKEN).await.unwrap();

        let paths: Vec<String> = received(&server)
            .await
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                format!("{REPO_PREFIX}/ref/heads/fix%231"),
                format!("{REPO_PREFIX}/refs/heads/fix%231"),
            ]
        );
    }

    #[tokio::test]
    async fn branch_with_percent_is_not_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/a%252Fb")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("ab-tip")))
            .expect(1)
            .mount(&server)
            .await;

        let sha = client(&server)
            .get_branch_sha(&repo(), &BranchName::new("a%2Fb").unwrap(), TOKEN)
            .await
            .unwrap();
        assert_eq!(sha, "ab-tip");
    }

    #[tokio::test]
    async fn nested_branch_keeps_slashes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/solutions/2024")))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("nested-tip")))
            .expect(1)
            .mount(&server)
            .await;

        let sha = client(&server)
            .get_branch_sha(&repo(), &BranchName::new("solutions/2024").unwrap(), TOKEN)
            .await
            .unwrap();
        assert_eq!(sha, "nested-tip");
    }

    #[tokio::test]
    async fn create_blob_sends_base64_utf8() {
        let server = MockServer::start().await;
        let content = "// héllo, 世界\n";
        Mock::given(method("POST"))
            .and(path(format!("{REPO_PREFIX}/blobs")))
            .and(body_partial_json(json!({ "encoding": "base64" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "b1" })))
            .mount(&server)
            .await;

        let sha = client(&server).create_blob(&repo(), content, TOKEN).await.unwrap();
        assert_eq!(sha, "b1");

        let requests = received(&server).await;
        let sent = body(&requests[0]);
        assert_eq!(sent["content"], json!("Ly8gaMOpbGxvLCDkuJbnlYwK"));
    }

    #[tokio::test]
    async fn create_tree_sends_entries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{REPO_PREFIX}/trees")))
            .and(body_partial_json(json!({ "base_tree": "base" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": "t1" })))
            .expect(1)
            .mount(&server)
            .await;

        let path = leethub::core::types::TreePath::join("", "README.md").unwrap();
        let entries = vec![FileEntry::blob(&path, "b1".to_string())];
        let sha = client(&server)
            .create_tree(&repo(), "base", &entries, TOKEN)
            .await
            .unwrap();
        assert_eq!(sha, "t1");

        let requests = received(&server).await;
        assert_eq!(body(&requests[0])["tree"][0]["path"], json!("README.md"));
    }

    #[tokio::test]
    async fn update_branch_never_forces() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(format!("{REPO_PREFIX}/refs/heads/main")))
            .and(body_partial_json(json!({ "sha": "c1", "force": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ref_body("c1")))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_branch(&repo(), &main_branch(), "c1", TOKEN)
            .await
            .unwrap();
    }
}

// =============================================================================
// Error mapping
// =============================================================================

mod errors {
    use super::*;

    async fn ref_error(template: ResponseTemplate) -> ForgeError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PREFIX}/ref/heads/main")))
            .respond_with(template)
            .mount(&server)
            .await;

        client(&server)
            .get_branch_sha(&repo(), &main_branch(), TOKEN)
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failed() {
        let err = ref_error(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .await;
        assert!(matches!(err, ForgeError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn forbidden_reports_required_permissions() {
        let err = ref_error(
            ResponseTemplate::new(403)
                .insert_header("X-Accepted-GitHub-Permissions", "contents=write")
                .set_body_json(json!({ "message": "Resource not accessible" })),
        )
        .await;

        match err {
            ForgeError::AuthFailed(message) => {
                assert!(message.contains("Resource not accessible"));
                assert!(message.contains("contents=write"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let err = ref_error(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .await;
        assert_eq!(err, ForgeError::NotFound("Not Found".into()));
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let err = ref_error(ResponseTemplate::new(429)).await;
        assert_eq!(err, ForgeError::RateLimited);
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let err = ref_error(ResponseTemplate::new(503)).await;
        match err {
            ForgeError::ApiError { status, message } => {
                assert_eq!(status, 503);
                assert!(message.starts_with("GitHub server error"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_success_body_is_api_error() {
        let err = ref_error(ResponseTemplate::new(200).set_body_string("not json")).await;
        assert!(matches!(err, ForgeError::ApiError { status: 200, .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let api = GitHubGitData::with_api_base("http://127.0.0.1:1");
        let err = api
            .get_branch_sha(&repo(), &main_branch(), TOKEN)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::NetworkError(_)));
    }
}
