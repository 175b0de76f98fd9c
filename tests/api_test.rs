//
//  stash-client
//  tests/api_test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use stash_client::api::common::{ErrorKind, Outcome, StashError};
use stash_client::api::server::permissions::PermissionQuery;
use stash_client::api::server::repositories::{CreateRepositoryRequest, ForkRequest};
use stash_client::api::server::{PullRequestDraft, PullRequestState};
use stash_client::api::StashClient;
use stash_client::auth::{CredentialSource, Credentials};

const API: &str = "/rest/api/1.0";

fn client_for(server: &ServerGuard) -> StashClient {
    StashClient::new(
        &server.host_with_port(),
        CredentialSource::Provided(Credentials::new("bob", "pw")),
    )
    .unwrap()
    .with_scheme("http")
}

fn repo_json(id: u64, slug: &str) -> serde_json::Value {
    json!({
        "id": id,
        "slug": slug,
        "name": slug,
        "scmId": "git",
        "project": {"id": 1, "key": "TEAM", "name": "Team"},
        "links": {
            "clone": [{"href": format!("ssh://git@stash.example.com:7999/team/{}.git", slug), "name": "ssh"}]
        }
    })
}

#[tokio::test]
async fn test_list_repositories_walks_every_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", format!("{}/projects/TEAM/repos", API).as_str())
        .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"values": [repo_json(1, "one")], "isLastPage": false, "nextPageStart": 1})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", format!("{}/projects/TEAM/repos", API).as_str())
        .match_query(Matcher::UrlEncoded("start".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"values": [repo_json(2, "two")], "isLastPage": true}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let repos = client
        .list_repositories(None, Some("TEAM"), None, Some(0))
        .await
        .unwrap()
        .completed()
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(repos.page_count, 2);
    assert_eq!(repos.entity_count, 2);
    let ids: Vec<Option<u64>> = repos.entities().iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{}/repos", API).as_str())
        .match_query(Matcher::Any)
        .match_header("authorization", "Basic Ym9iOnB3")
        .with_status(200)
        .with_body(json!({"values": [], "isLastPage": true}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let repos = client
        .list_repositories(None, None, None, None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(repos.page_count, 1);
    assert_eq!(repos.entity_count, 0);
}

#[tokio::test]
async fn test_create_repository_without_owner_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .create_repository(None, None, &CreateRepositoryRequest::new("tools"))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);
}

#[tokio::test]
async fn test_create_repository_posts_name_and_scm() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("{}/projects/TEAM/repos", API).as_str())
        .match_body(Matcher::PartialJson(json!({"name": "tools", "scmId": "git"})))
        .with_status(201)
        .with_body(repo_json(7, "tools").to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let repo = client
        .create_repository(None, Some("TEAM"), &CreateRepositoryRequest::new("tools"))
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(repo.id(), Some(7));
    assert_eq!(
        repo.ssh_clone_url().unwrap(),
        "ssh://git@stash.example.com:7999/team/tools.git"
    );
}

#[tokio::test]
async fn test_fork_repository_into_personal_project() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("{}/projects/TEAM/repos/tools", API).as_str())
        .match_body(Matcher::Json(json!({})))
        .with_status(201)
        .with_body(repo_json(8, "tools").to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let fork = client
        .fork_repository("tools", None, Some("TEAM"), &ForkRequest::new())
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fork.id(), Some(8));
}

#[tokio::test]
async fn test_delete_missing_repository_is_response_failure() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", format!("{}/users/bob/repos/ghost", API).as_str())
        .with_status(404)
        .with_body(
            json!({"errors": [{"context": null, "message": "Repository ghost does not exist."}]})
                .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .delete_repository("ghost", Some("bob"), None)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(404));
    let messages: Vec<Option<String>> = err
        .api_errors()
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(
        messages,
        vec![Some("Repository ghost does not exist.".to_string())]
    );
}

#[tokio::test]
async fn test_delete_repository_reports_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", format!("{}/projects/TEAM/repos/tools", API).as_str())
        .with_status(202)
        .with_body(json!({"context": null, "message": "Repository scheduled for deletion."}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let ack = client
        .delete_repository("tools", None, Some("TEAM"))
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(ack.status, 202);
    assert_eq!(ack.message.as_deref(), Some("Repository scheduled for deletion."));
}

#[tokio::test]
async fn test_dry_run_never_reaches_server() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let client = client_for(&server).with_dry_run(true);
    let outcome = client
        .create_repository(Some("bob"), None, &CreateRepositoryRequest::new("tools"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(matches!(outcome, Outcome::DryRun));
    let recorded = client.recorded_requests();
    assert_eq!(recorded.len(), 1);
    assert!(recorded[0].url.ends_with("/rest/api/1.0/users/bob/repos"));
}

#[tokio::test]
async fn test_list_pull_requests_sends_state() {
    let mut server = Server::new_async().await;
    let pr = json!({
        "id": 5,
        "title": "Fix login",
        "state": "MERGED",
        "createdDate": 1000,
        "author": {"user": {"name": "alice"}},
        "fromRef": {"id": "refs/heads/fix", "displayId": "fix", "repository": {"id": 3, "slug": "tools"}},
        "toRef": {"id": "refs/heads/master", "displayId": "master", "repository": {"id": 3, "slug": "tools"}},
        "reviewers": []
    });
    let mock = server
        .mock("GET", format!("{}/projects/TEAM/repos/tools/pull-requests", API).as_str())
        .match_query(Matcher::UrlEncoded("state".into(), "MERGED".into()))
        .with_status(200)
        .with_body(json!({"values": [pr], "isLastPage": true}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let prs = client
        .list_pull_requests("tools", None, Some("TEAM"), Some(PullRequestState::Merged), None, None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    let pr = &prs.entities()[0];
    assert_eq!(pr.id, Some(5));
    assert_eq!(pr.state, PullRequestState::Merged);
    assert!(pr.is_local());
}

#[tokio::test]
async fn test_create_pull_request_posts_refs_and_reviewers() {
    let mut server = Server::new_async().await;
    let created = json!({
        "id": 9,
        "title": "Feature login",
        "state": "OPEN",
        "author": {"user": {"name": "bob"}},
        "fromRef": {"id": "refs/heads/feature/login", "repository": {"id": 3, "slug": "tools"}},
        "toRef": {"id": "refs/heads/master", "repository": {"id": 3, "slug": "tools"}},
        "reviewers": [{"user": {"name": "alice"}, "approved": false}]
    });
    let mock = server
        .mock("POST", format!("{}/projects/TEAM/repos/tools/pull-requests", API).as_str())
        .match_body(Matcher::PartialJson(json!({
            "title": "Feature login",
            "fromRef": {"id": "feature/login"},
            "toRef": {"id": "master"},
            "reviewers": [{"user": {"name": "alice"}}]
        })))
        .with_status(201)
        .with_body(created.to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let draft = PullRequestDraft::new("tools", "feature/login").reviewers(["alice"]);
    let pr = client
        .create_pull_request(None, Some("TEAM"), &draft)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(pr.id, Some(9));
    let reviewers: Vec<&str> = pr.reviewers.iter().map(|user| user.name()).collect();
    assert_eq!(reviewers, vec!["alice"]);
    assert!(pr.approved_by.is_empty());
}

#[tokio::test]
async fn test_list_group_permissions_with_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{}/projects/TEAM/permissions/groups", API).as_str())
        .match_query(Matcher::UrlEncoded("filter".into(), "dev".into()))
        .with_status(200)
        .with_body(
            json!({
                "values": [{"group": {"name": "developers"}, "permission": "PROJECT_WRITE"}],
                "isLastPage": true
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let query = PermissionQuery {
        project: Some("TEAM"),
        filter: Some("dev"),
        ..Default::default()
    };
    let grants = client
        .list_group_permissions(&query, None, None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    let grant = &grants.entities()[0];
    assert_eq!(grant.grantee.name(), "developers");
    assert_eq!(grant.permission, "PROJECT_WRITE");
}

#[tokio::test]
async fn test_malformed_page_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{}/repos", API).as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"values": [], "isLastPage": false}).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .list_repositories(None, None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StashError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_blank_repository_name_sends_nothing() {
    let mut server = Server::new_async().await;
    let post = server.mock("POST", Matcher::Any).expect(0).create_async().await;
    let delete = server.mock("DELETE", Matcher::Any).expect(0).create_async().await;

    let client = client_for(&server);
    let err = client
        .create_repository(None, Some("TEAM"), &CreateRepositoryRequest::new(""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);

    let err = client
        .fork_repository("", None, Some("TEAM"), &ForkRequest::new().named("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);

    let err = client
        .delete_repository("", None, Some("TEAM"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);

    post.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_fork_repository_with_name_into_project() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", format!("{}/users/bob/repos/dotfiles", API).as_str())
        .match_body(Matcher::Json(
            json!({"name": "dotfiles-team", "project": {"key": "TEAM"}}),
        ))
        .with_status(201)
        .with_body(repo_json(12, "dotfiles-team").to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let request = ForkRequest::new().named("dotfiles-team").into_project("TEAM");
    let fork = client
        .fork_repository("dotfiles", Some("bob"), None, &request)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fork.id(), Some(12));
    assert_eq!(fork.slug(), "dotfiles-team");
    assert_eq!(fork.project.key(), "TEAM");
}

#[tokio::test]
async fn test_list_user_permissions_on_repository() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            format!("{}/projects/TEAM/repos/tools/permissions/users", API).as_str(),
        )
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "values": [
                    {"user": {"name": "alice", "displayName": "Alice"}, "permission": "REPO_ADMIN"},
                    {"user": {"name": "bob"}, "permission": "REPO_READ"}
                ],
                "isLastPage": true
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let query = PermissionQuery {
        project: Some("TEAM"),
        repository: Some("tools"),
        ..Default::default()
    };
    let grants = client
        .list_user_permissions(&query, None, None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    mock.assert_async().await;
    let names: Vec<(&str, &str)> = grants
        .entities()
        .iter()
        .map(|grant| (grant.grantee.name(), grant.permission.as_str()))
        .collect();
    assert_eq!(names, vec![("alice", "REPO_ADMIN"), ("bob", "REPO_READ")]);
    assert!(grants
        .entities()
        .iter()
        .all(|grant| grant.grantee.kind() == "user"));
}
