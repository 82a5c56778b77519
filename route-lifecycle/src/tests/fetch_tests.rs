//! Fetch pipeline tests - ordering, directives and rejection handling

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::support::{bare_context, shared};
use crate::{
    Component, FetchOptions, NavigationDirective, NavigationErrorCode, Rejection, Route,
    RouteComponent, run_fetch_client, run_fetch_server,
};

// =============================================================================
// Test Helpers
// =============================================================================

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Pipeline hooks that record their execution in `log`.
fn logging_options(log: &Log) -> FetchOptions {
    let (pre, global, post) = (log.clone(), log.clone(), log.clone());
    FetchOptions::new()
        .middleware(move |_ctx| {
            let log = pre.clone();
            async move {
                log.lock().await.push("middleware".to_string());
                Ok(())
            }
        })
        .global_fetch_data(move |_ctx| {
            let log = global.clone();
            async move {
                log.lock().await.push("fetch:global".to_string());
                Ok(None)
            }
        })
        .post_middleware(move |_ctx| {
            let log = post.clone();
            async move {
                log.lock().await.push("postMiddleware".to_string());
                Ok(())
            }
        })
}

/// Component whose loader records itself and returns `directive`.
fn loader(
    name: &'static str,
    log: &Log,
    directive: Option<NavigationDirective>,
) -> Arc<dyn RouteComponent> {
    let log = log.clone();
    shared(Component::new(name).fetch_data(move |_ctx| {
        let log = log.clone();
        let directive = directive.clone();
        async move {
            log.lock().await.push(format!("fetch:{name}"));
            Ok(directive)
        }
    }))
}

fn rejecting(name: &'static str, rejection: Rejection) -> Arc<dyn RouteComponent> {
    shared(Component::new(name).fetch_data(move |_ctx| {
        let rejection = rejection.clone();
        async move { Err(rejection) }
    }))
}

fn ctx() -> crate::FetchContext {
    bare_context(Route::new("/b"), Route::new("/a"))
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn steps_run_in_order() {
    let log = log();
    let components = vec![loader("A", &log, None), loader("B", &log, None)];

    let result = run_fetch_client(&ctx(), &components, &logging_options(&log), None).await;
    assert_eq!(result, Ok(None));

    let log = log.lock().await;
    assert_eq!(log.len(), 5);
    assert_eq!(log.first().map(String::as_str), Some("middleware"));
    assert_eq!(log.last().map(String::as_str), Some("postMiddleware"));
    let mut fetches: Vec<&str> = log[1..4].iter().map(String::as_str).collect();
    fetches.sort();
    assert_eq!(fetches, ["fetch:A", "fetch:B", "fetch:global"]);
}

#[tokio::test]
async fn components_without_loader_are_skipped() {
    let log = log();
    let components = vec![shared(Component::new("Static")), loader("A", &log, None)];

    run_fetch_client(&ctx(), &components, &FetchOptions::new(), None)
        .await
        .unwrap();
    assert_eq!(*log.lock().await, ["fetch:A"]);
}

#[tokio::test]
async fn loaders_run_concurrently() {
    let gate = Arc::new(tokio::sync::Barrier::new(2));
    let make = |name: &'static str| {
        let gate = gate.clone();
        shared(Component::new(name).fetch_data(move |_ctx| {
            let gate = gate.clone();
            async move {
                // Both loaders must be in flight for the barrier to open.
                gate.wait().await;
                Ok(None)
            }
        }))
    };
    let components = vec![make("A"), make("B")];

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_fetch_client(&ctx(), &components, &FetchOptions::new(), None),
    )
    .await;
    assert_eq!(result, Ok(Ok(None)));
}

#[tokio::test]
async fn loaders_receive_the_context() {
    let seen = log();
    let recorder = seen.clone();
    let component = shared(Component::new("Page").fetch_data(move |ctx| {
        let recorder = recorder.clone();
        async move {
            recorder
                .lock()
                .await
                .push(format!("{} <- {}", ctx.route.path, ctx.from.path));
            Ok(None)
        }
    }));

    run_fetch_client(&ctx(), &[component], &FetchOptions::new(), None)
        .await
        .unwrap();
    assert_eq!(*seen.lock().await, ["/b <- /a"]);
}

// =============================================================================
// Directives
// =============================================================================

#[tokio::test]
async fn first_directive_wins_in_match_order() {
    let log = log();
    let components = vec![
        loader("A", &log, None),
        loader("B", &log, Some(NavigationDirective::redirect("/login"))),
        loader("C", &log, Some(NavigationDirective::Abort)),
    ];

    let result = run_fetch_client(&ctx(), &components, &FetchOptions::new(), None).await;
    assert_eq!(result, Ok(Some(NavigationDirective::redirect("/login"))));
}

#[tokio::test]
async fn global_directive_precedes_components() {
    let log = log();
    let options = FetchOptions::new()
        .global_fetch_data(|_ctx| async { Ok(Some(NavigationDirective::Abort)) });
    let components = vec![loader("A", &log, Some(NavigationDirective::redirect("/x")))];

    let result = run_fetch_client(&ctx(), &components, &options, None).await;
    assert_eq!(result, Ok(Some(NavigationDirective::Abort)));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn string_rejection_normalized_on_client() {
    let components = vec![rejecting("A", Rejection::from("error"))];

    let err = run_fetch_client(&ctx(), &components, &FetchOptions::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, NavigationErrorCode::Rejected);
    assert_eq!(err.message, "error");
}

#[tokio::test]
async fn object_rejection_normalized_on_client() {
    let components = vec![rejecting("A", Rejection::value(json!({"error": "oops"})))];

    let err = run_fetch_client(&ctx(), &components, &FetchOptions::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.message, r#"{"error":"oops"}"#);
}

#[tokio::test]
async fn server_rejection_propagates_untouched() {
    let components = vec![rejecting("A", Rejection::value(json!({"error": "oops"})))];

    let err = run_fetch_server(&ctx(), &components, &FetchOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err, Rejection::Value(json!({"error": "oops"})));
}

#[tokio::test]
async fn middleware_failure_stops_pipeline() {
    let log = log();
    let options = logging_options(&log).middleware(|_ctx| async {
        Err(crate::NavigationError::middleware("not signed in").into())
    });
    let components = vec![loader("A", &log, None)];

    let err = run_fetch_client(&ctx(), &components, &options, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, NavigationErrorCode::Middleware);
    assert!(log.lock().await.is_empty());
}

#[tokio::test]
async fn fetch_failure_skips_post_middleware() {
    let log = log();
    let components = vec![rejecting("A", Rejection::from("down"))];

    let result = run_fetch_client(&ctx(), &components, &logging_options(&log), None).await;
    assert!(result.is_err());
    assert!(!log.lock().await.contains(&"postMiddleware".to_string()));
}

#[tokio::test]
async fn first_rejection_does_not_wait_for_slow_loaders() {
    let slow = shared(Component::new("Slow").fetch_data(|_ctx| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }));
    let components = vec![slow, rejecting("Fast", Rejection::from("fast failure"))];

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_fetch_client(&ctx(), &components, &FetchOptions::new(), None),
    )
    .await
    .expect("rejection should surface before the slow loader settles");
    assert_eq!(result.unwrap_err().message, "fast failure");
}

#[tokio::test]
async fn panicking_loader_becomes_internal_error() {
    let components = vec![shared(Component::new("Boom").fetch_data(|_ctx| async {
        if true {
            panic!("loader bug");
        }
        Ok(None)
    }))];

    let err = run_fetch_client(&ctx(), &components, &FetchOptions::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, NavigationErrorCode::Internal);
}

#[test]
#[should_panic]
fn loaders_require_a_tokio_runtime() {
    let components = vec![loader("A", &log(), None)];
    let _ = futures::executor::block_on(run_fetch_server(
        &ctx(),
        &components,
        &FetchOptions::new(),
    ));
}
