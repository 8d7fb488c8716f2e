//! Login, guard and logout working together

use envmon_session::prelude::*;
use envmon_session::{AuthenticationError, FileMarkerStore, LOGIN_ROUTE};
use envmon_test_utils::{admin_credentials, operator_credentials, FakeAuth};
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Console {
    session: Session,
    guard: RouteGuard,
    flow: LoginFlow,
}

impl Console {
    fn new(marker: Arc<dyn MarkerStore>) -> Self {
        Self {
            session: Session::restore(Arc::new(FakeAuth::standard()), marker),
            guard: RouteGuard::new(Arc::new(RouteTable::standard())),
            flow: LoginFlow::new(),
        }
    }

    fn navigate(&self, target: &str) -> NavigationOutcome {
        let outcome = self.guard.check(&self.session, &target.into());
        self.flow.observe(&outcome);
        outcome
    }
}

#[tokio::test]
async fn login_logout_scenario() {
    let console = Console::new(Arc::new(MemoryMarkerStore::new()));

    let user = console.session.login(&operator_credentials()).await.unwrap();
    assert!(console.session.is_authenticated());
    assert!(!user.id.is_empty());
    assert_eq!(console.navigate("report").route().name, "report");

    console.session.logout();
    assert!(!console.session.is_authenticated());
    assert!(console.session.current_user().is_none());

    let outcome = console.navigate("report");
    assert!(outcome.is_redirect());
    assert_eq!(outcome.route().name, LOGIN_ROUTE);
}

#[tokio::test]
async fn deep_link_is_replayed_after_login() {
    let console = Console::new(Arc::new(MemoryMarkerStore::new()));

    assert!(console.navigate("/history-trend?monitor=M1").is_redirect());

    let next = console
        .flow
        .submit(&console.session, &operator_credentials())
        .await
        .unwrap();
    let outcome = console.guard.check(&console.session, &next);
    assert_eq!(outcome.route().name, "history-trend");
}

#[tokio::test]
async fn anonymous_never_passes_the_gate() {
    let console = Console::new(Arc::new(MemoryMarkerStore::new()));
    let names: Vec<String> = console.guard.routes().iter().map(|r| r.name.clone()).collect();

    for name in names {
        let outcome = console.navigate(&name);
        if name == LOGIN_ROUTE {
            assert!(!outcome.is_redirect());
        } else {
            assert_eq!(outcome.route().name, LOGIN_ROUTE, "{name}");
        }
    }
}

#[tokio::test]
async fn rejected_and_unavailable_are_distinguished() {
    let auth = Arc::new(FakeAuth::standard());
    let session = Session::new(auth.clone(), Arc::new(MemoryMarkerStore::new()));

    let err = session
        .login(&Credentials::new("operator", "not-the-password"))
        .await
        .unwrap_err();
    assert!(err.is_user_facing());

    auth.set_offline(true);
    let err = session.login(&operator_credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Authentication(AuthenticationError::Unavailable(_))
    ));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn file_marker_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let console = Console::new(Arc::new(FileMarkerStore::new(&path)));
        console.session.login(&admin_credentials()).await.unwrap();
    }

    let restarted = Console::new(Arc::new(FileMarkerStore::new(&path)));
    assert!(restarted.session.is_authenticated());
    assert!(restarted.session.current_capabilities().is_wildcard());

    restarted.session.logout();
    assert!(!path.exists());
    assert!(!Console::new(Arc::new(FileMarkerStore::new(&path))).session.is_authenticated());
}

#[tokio::test]
async fn corrupt_marker_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").unwrap();

    let console = Console::new(Arc::new(FileMarkerStore::new(&path)));
    assert!(!console.session.is_authenticated());
    assert!(!path.exists());
}
