use pretty_assertions::assert_eq;
use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

mod common;

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_reassign_keeps_position() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team("core", &[("u1", true), ("u2", true), ("u3", true), ("u4", true)])
        .await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;
    let old = pr.assigned_reviewers[0].clone();
    let kept = pr.assigned_reviewers[1].clone();
    let expected_new = ["u2", "u3", "u4"]
        .iter()
        .map(|u| ctx.id(u))
        .find(|id| !pr.assigned_reviewers.contains(id))
        .unwrap();

    let (updated, replaced_by) = ctx
        .state
        .reassignment_service
        .reassign(&pr.pull_request_id, &old)
        .await
        .unwrap();

    assert_eq!(replaced_by, expected_new);
    assert_eq!(updated.assigned_reviewers, vec![expected_new, kept]);
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_reassign_endpoint() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team("core", &[("u1", true), ("u2", true), ("u3", true)])
        .await;
    ctx.seed_team("other", &[("x1", true)]).await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;
    let app = init_app!(ctx.state);

    // Only u2 and u3 exist as teammates and both are assigned.
    let req = test::TestRequest::post()
        .uri("/pullRequest/reassign")
        .set_json(json!({
            "pull_request_id": pr.pull_request_id,
            "old_reviewer_id": pr.assigned_reviewers[0]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], json!("NO_CANDIDATE"));

    let req = test::TestRequest::post()
        .uri("/pullRequest/reassign")
        .set_json(json!({
            "pull_request_id": pr.pull_request_id,
            "old_user_id": ctx.id("x1")
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], json!("NOT_ASSIGNED"));
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_reassign_errors() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team("core", &[("u1", true), ("u2", true), ("u3", true), ("u4", true)])
        .await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;
    let service = &ctx.state.reassignment_service;

    let missing = service.reassign(&ctx.id("ghost"), &ctx.id("u2")).await;
    assert_eq!(missing.unwrap_err().code(), "NOT_FOUND");

    let author = service.reassign(&pr.pull_request_id, &ctx.id("u1")).await;
    assert_eq!(author.unwrap_err().code(), "NOT_ASSIGNED");

    ctx.state
        .pull_request_service
        .merge(&pr.pull_request_id)
        .await
        .unwrap();
    let merged = service
        .reassign(&pr.pull_request_id, &pr.assigned_reviewers[0])
        .await;
    assert_eq!(merged.unwrap_err().code(), "PR_MERGED");

    let after = ctx
        .state
        .pull_request_service
        .get(&pr.pull_request_id)
        .await
        .unwrap();
    assert_eq!(after.assigned_reviewers, pr.assigned_reviewers);
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_inactive_teammates_are_not_candidates() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team("core", &[("u1", true), ("u2", true), ("u3", true), ("u4", false)])
        .await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;

    let err = ctx
        .state
        .reassignment_service
        .reassign(&pr.pull_request_id, &pr.assigned_reviewers[0])
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NO_CANDIDATE");
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_concurrent_reassign_of_same_reviewer() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team(
        "core",
        &[("u1", true), ("u2", true), ("u3", true), ("u4", true), ("u5", true)],
    )
    .await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;
    let old = pr.assigned_reviewers[0].clone();
    let service = ctx.state.reassignment_service.clone();

    let (a, b) = tokio::join!(
        service.reassign(&pr.pull_request_id, &old),
        service.reassign(&pr.pull_request_id, &old)
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(err.code(), "NOT_ASSIGNED");

    let after = ctx
        .state
        .pull_request_service
        .get(&pr.pull_request_id)
        .await
        .unwrap();
    assert_eq!(after.assigned_reviewers.len(), 2);
    assert!(!after.has_reviewer(&old));
    assert_ne!(after.assigned_reviewers[0], after.assigned_reviewers[1]);
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_concurrent_reassign_of_different_reviewers() {
    let ctx = common::TestContext::new().await;
    // One spare teammate: the second swap can only use the reviewer the first
    // one released.
    ctx.seed_team("core", &[("u1", true), ("u2", true), ("u3", true), ("u4", true)])
        .await;
    let pr = ctx.open_pull_request("pr-1", "u1").await;
    let first = pr.assigned_reviewers[0].clone();
    let second = pr.assigned_reviewers[1].clone();
    let service = ctx.state.reassignment_service.clone();

    let (a, b) = tokio::join!(
        service.reassign(&pr.pull_request_id, &first),
        service.reassign(&pr.pull_request_id, &second)
    );
    let (_, replaced_first) = a.unwrap();
    let (_, replaced_second) = b.unwrap();
    assert_ne!(replaced_first, replaced_second);

    let after = ctx
        .state
        .pull_request_service
        .get(&pr.pull_request_id)
        .await
        .unwrap();
    assert_eq!(after.assigned_reviewers.len(), 2);
    assert_ne!(after.assigned_reviewers[0], after.assigned_reviewers[1]);
    assert!(!after.has_reviewer(&ctx.id("u1")));
    for reviewer in &after.assigned_reviewers {
        assert!(*reviewer == replaced_first || *reviewer == replaced_second);
    }
}

#[actix_rt::test]
#[ignore = "needs TEST_DATABASE_URL"]
async fn test_merge_racing_reassign() {
    let ctx = common::TestContext::new().await;
    ctx.seed_team(
        "core",
        &[("u1", true), ("u2", true), ("u3", true), ("u4", true), ("u5", true)],
    )
    .await;

    for round in 0..10 {
        let pr = ctx.open_pull_request(&format!("pr-{}", round), "u1").await;
        let old = pr.assigned_reviewers[0].clone();

        let (merged, reassigned) = tokio::join!(
            ctx.state.pull_request_service.merge(&pr.pull_request_id),
            ctx.state.reassignment_service.reassign(&pr.pull_request_id, &old)
        );
        let merged = merged.unwrap();
        assert!(merged.is_merged());

        match reassigned {
            // The swap committed first; the merge froze the swapped list.
            Ok((swapped, replaced_by)) => {
                assert_eq!(merged.assigned_reviewers, swapped.assigned_reviewers);
                assert!(merged.has_reviewer(&replaced_by));
                assert!(!merged.has_reviewer(&old));
            }
            // The merge committed first; the reviewers are untouched.
            Err(err) => {
                assert_eq!(err.code(), "PR_MERGED");
                assert_eq!(merged.assigned_reviewers, pr.assigned_reviewers);
            }
        }

        let after = ctx
            .state
            .pull_request_service
            .get(&pr.pull_request_id)
            .await
            .unwrap();
        assert_eq!(after.assigned_reviewers, merged.assigned_reviewers);
        assert_eq!(after.merged_at, merged.merged_at);

        let late = ctx
            .state
            .reassignment_service
            .reassign(&pr.pull_request_id, &after.assigned_reviewers[0])
            .await;
        assert_eq!(late.unwrap_err().code(), "PR_MERGED");
    }
}
