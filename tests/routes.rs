#![cfg(feature = "sqlite")]

use ask_expert::{
    bootstrap,
    config::{AnswerPolicy, Config},
    db::{DbPool, QaStorage, User},
    qa_router,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN: (&str, &str) = ("admin", "admin-pw");

struct TestApp {
    _dir: TempDir,
    app: Router,
    pool: DbPool,
}

async fn spawn_app(policy: AnswerPolicy) -> TestApp {
    let dir = TempDir::new().expect("failed to create temp dir");
    let cfg = Config {
        database_url: format!("sqlite:{}", dir.path().join("qa.db").display()),
        answer_policy: policy,
        insecure_cookie: true,
        admin_name: Some(ADMIN.0.to_string()),
        admin_password: Some(ADMIN.1.to_string()),
        ..Config::default()
    };
    let state = bootstrap::connect(&cfg).await.expect("bootstrap failed");
    let pool = state.pool.clone();
    TestApp {
        _dir: dir,
        app: qa_router(state),
        pool,
    }
}

fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("qa_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn form_request(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    req.body(Body::from(form.to_string()))
        .expect("failed to build request")
}

async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

impl TestApp {
    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.app
            .clone()
            .oneshot(req.body(Body::empty()).expect("failed to build request"))
            .await
            .expect("request failed")
    }

    async fn post(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(form_request(uri, form, cookie))
            .await
            .expect("request failed")
    }

    async fn register(&self, name: &str, password: &str) -> String {
        let resp = self
            .post("/register", &format!("name={name}&password={password}"), None)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        session_cookie(&resp).expect("registration did not start a session")
    }

    async fn login(&self, name: &str, password: &str) -> String {
        let resp = self
            .post("/login", &format!("name={name}&password={password}"), None)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        session_cookie(&resp).expect("login did not start a session")
    }

    async fn user(&self, name: &str) -> Option<User> {
        let mut conn = self.pool.acquire().await.unwrap();
        QaStorage::new(&mut conn).user_by_name(name).await.unwrap()
    }

    async fn user_count(&self) -> usize {
        let mut conn = self.pool.acquire().await.unwrap();
        QaStorage::new(&mut conn).list_users().await.unwrap().len()
    }

    /// Register `name`, have the admin promote them, return (cookie, id).
    async fn expert(&self, admin_cookie: &str, name: &str) -> (String, i64) {
        let cookie = self.register(name, "pw").await;
        let id = self.user(name).await.unwrap().id;
        let resp = self.get(&format!("/promote/{id}"), Some(admin_cookie)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        (cookie, id)
    }

    async fn ask(&self, cookie: &str, text: &str, expert_id: i64) -> i64 {
        let resp = self
            .post(
                "/ask",
                &format!("question={text}&expert={expert_id}"),
                Some(cookie),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        let mut conn = self.pool.acquire().await.unwrap();
        let mut store = QaStorage::new(&mut conn);
        let mut id = 1;
        while let Some(q) = store.answer_target(id).await.unwrap() {
            if q.question_text == text.replace('+', " ") && q.expert_id == expert_id {
                return q.id;
            }
            id += 1;
        }
        panic!("question {text:?} was not stored");
    }

    async fn unanswered_count(&self, expert_id: i64) -> usize {
        let mut conn = self.pool.acquire().await.unwrap();
        QaStorage::new(&mut conn)
            .unanswered_for(expert_id)
            .await
            .unwrap()
            .len()
    }

    async fn answer_text(&self, question_id: i64) -> Option<String> {
        let mut conn = self.pool.acquire().await.unwrap();
        QaStorage::new(&mut conn)
            .answer_target(question_id)
            .await
            .unwrap()
            .expect("question missing")
            .answer_text
    }
}

#[tokio::test]
async fn registration_creates_plain_member_and_signs_in() {
    let app = spawn_app(AnswerPolicy::default()).await;

    let resp = app.post("/register", "name=alice&password=secret", None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    let cookie = session_cookie(&resp).unwrap();

    let user = app.user("alice").await.unwrap();
    assert!(!user.expert);
    assert!(!user.admin);
    assert_ne!(user.password, "secret");

    let home = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(home.contains("Signed in as alice"));
}

#[tokio::test]
async fn duplicate_registration_is_rejected_inline() {
    let app = spawn_app(AnswerPolicy::default()).await;
    app.register("alice", "one").await;
    let before = app.user_count().await;

    let resp = app.post("/register", "name=alice&password=two", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("User already exists!"));
    assert_eq!(app.user_count().await, before);
}

#[tokio::test]
async fn registration_requires_name_and_password() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let resp = app.post("/register", "name=+&password=", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Name and password are required"));
}

#[tokio::test]
async fn login_distinguishes_wrong_password_from_unknown_user() {
    let app = spawn_app(AnswerPolicy::default()).await;
    app.register("alice", "secret").await;

    let resp = app.post("/login", "name=alice&password=nope", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&resp).is_none());
    assert!(body_text(resp).await.contains("The password is incorrect"));

    let resp = app.post("/login", "name=mallory&password=secret", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("The username is incorrect"));

    let cookie = app.login("alice", "secret").await;
    let home = body_text(app.get("/", Some(&cookie)).await).await;
    assert!(home.contains("Signed in as alice"));
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let cookie = app.register("alice", "secret").await;

    let resp = app.get("/logout", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(session_cookie(&resp).as_deref(), Some("qa_session="));
}

#[tokio::test]
async fn forged_session_cookie_is_anonymous() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let resp = app.get("/ask", Some("qa_session=1")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn anonymous_access_to_protected_routes_redirects_to_login() {
    let app = spawn_app(AnswerPolicy::default()).await;
    for uri in ["/ask", "/answer/1", "/unanswered", "/users", "/promote/1"] {
        let resp = app.get(uri, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }
    let resp = app.post("/answer/1", "answer=hi", None).await;
    assert_eq!(location(&resp), "/login");
    let resp = app.post("/ask", "question=hi&expert=1", None).await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn missing_roles_redirect_home() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let cookie = app.register("alice", "secret").await;

    for uri in ["/answer/1", "/unanswered", "/users", "/promote/1"] {
        let resp = app.get(uri, Some(&cookie)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/", "{uri}");
    }
    let resp = app.post("/answer/1", "answer=hi", Some(&cookie)).await;
    assert_eq!(location(&resp), "/");

    let alice = app.user("alice").await.unwrap();
    assert!(!alice.expert);
}

#[tokio::test]
async fn promote_is_idempotent() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (_, id) = app.expert(&admin, "erin").await;
    let once = app.user("erin").await.unwrap();
    assert!(once.expert);

    let resp = app.get(&format!("/promote/{id}"), Some(&admin)).await;
    assert_eq!(location(&resp), "/users");
    assert_eq!(app.user("erin").await.unwrap(), once);

    let users = body_text(app.get("/users", Some(&admin)).await).await;
    assert!(users.contains("erin"));
    assert!(users.contains("admin"));
}

#[tokio::test]
async fn question_lifecycle_from_queue_to_home_feed() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (erin, erin_id) = app.expert(&admin, "erin").await;
    let (frank, frank_id) = app.expert(&admin, "frank").await;
    let bob = app.register("bob", "pw").await;

    let ask_page = body_text(app.get("/ask", Some(&bob)).await).await;
    assert!(ask_page.contains(&format!("value=\"{erin_id}\"")));

    let q = app.ask(&bob, "why+is+the+sky+blue", erin_id).await;
    let other = app.ask(&bob, "what+is+rust", frank_id).await;

    let home = body_text(app.get("/", None).await).await;
    assert!(!home.contains("why is the sky blue"));

    let queue = body_text(app.get("/unanswered", Some(&erin)).await).await;
    assert!(queue.contains("why is the sky blue"));
    assert!(!queue.contains("what is rust"));

    let form = body_text(app.get(&format!("/answer/{q}"), Some(&erin)).await).await;
    assert!(form.contains("why is the sky blue"));

    let resp = app
        .post(&format!("/answer/{q}"), "answer=rayleigh+scattering", Some(&erin))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/unanswered");
    assert_eq!(app.answer_text(q).await.as_deref(), Some("rayleigh scattering"));

    let queue = body_text(app.get("/unanswered", Some(&erin)).await).await;
    assert!(!queue.contains("why is the sky blue"));
    let home = body_text(app.get("/", None).await).await;
    assert!(home.contains("why is the sky blue"));
    assert!(!home.contains("what is rust"));

    let detail = body_text(app.get(&format!("/question/{q}"), None).await).await;
    assert!(detail.contains("rayleigh scattering"));
    assert!(detail.contains("bob"));

    // Already answered: the form bounces to the question page.
    let resp = app.get(&format!("/answer/{q}"), Some(&erin)).await;
    assert_eq!(location(&resp), format!("/question/{q}"));
    let resp = app
        .post(&format!("/answer/{q}"), "answer=overwrite", Some(&erin))
        .await;
    assert_eq!(location(&resp), format!("/question/{q}"));
    assert_eq!(app.answer_text(q).await.as_deref(), Some("rayleigh scattering"));

    let queue = body_text(app.get("/unanswered", Some(&frank)).await).await;
    assert!(queue.contains("what is rust"));
    assert_eq!(app.answer_text(other).await, None);
}

#[tokio::test]
async fn assigned_expert_policy_blocks_answers_to_other_experts() {
    let app = spawn_app(AnswerPolicy::AssignedExpert).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (erin, _) = app.expert(&admin, "erin").await;
    let (_, frank_id) = app.expert(&admin, "frank").await;
    let bob = app.register("bob", "pw").await;
    let q = app.ask(&bob, "for+frank", frank_id).await;

    let resp = app.get(&format!("/answer/{q}"), Some(&erin)).await;
    assert_eq!(location(&resp), "/");

    let resp = app
        .post(&format!("/answer/{q}"), "answer=sneaky", Some(&erin))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(app.answer_text(q).await, None);
}

#[tokio::test]
async fn any_expert_policy_allows_answers_to_other_experts() {
    let app = spawn_app(AnswerPolicy::AnyExpert).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (erin, _) = app.expert(&admin, "erin").await;
    let (_, frank_id) = app.expert(&admin, "frank").await;
    let bob = app.register("bob", "pw").await;
    let q = app.ask(&bob, "for+frank", frank_id).await;

    let resp = app
        .post(&format!("/answer/{q}"), "answer=helpful", Some(&erin))
        .await;
    assert_eq!(location(&resp), "/unanswered");
    assert_eq!(app.answer_text(q).await.as_deref(), Some("helpful"));
}

#[tokio::test]
async fn ask_rejects_unknown_addressee_and_empty_text() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let bob = app.register("bob", "pw").await;
    let bob_id = app.user("bob").await.unwrap().id;

    let resp = app
        .post("/ask", "question=hello&expert=9999", Some(&bob))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please pick an expert from the list"));

    let resp = app
        .post("/ask", &format!("question=+&expert={bob_id}"), Some(&bob))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please write a question"));
}

#[tokio::test]
async fn missing_question_is_not_found() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let resp = app.get("/question/4242", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (erin, _) = app.expert(&admin, "erin").await;
    let resp = app.get("/answer/4242", Some(&erin)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_writes_are_all_stored() {
    let app = spawn_app(AnswerPolicy::default()).await;
    let admin = app.login(ADMIN.0, ADMIN.1).await;
    let (_, erin_id) = app.expert(&admin, "erin").await;
    let mut askers = Vec::new();
    for i in 0..5 {
        askers.push(app.register(&format!("asker{i}"), "pw").await);
    }
    let users_before = app.user_count().await;

    let mut handles = Vec::new();
    for i in 0..60 {
        let router = app.app.clone();
        let cookie = askers[i % askers.len()].clone();
        handles.push(tokio::spawn(async move {
            let req = form_request(
                "/ask",
                &format!("question=question{i}&expert={erin_id}"),
                Some(&cookie),
            );
            router.oneshot(req).await.expect("request failed").status()
        }));
    }
    for i in 0..10 {
        let router = app.app.clone();
        handles.push(tokio::spawn(async move {
            let req = form_request("/register", &format!("name=newcomer{i}&password=pw"), None);
            router.oneshot(req).await.expect("request failed").status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.expect("task panicked"), StatusCode::SEE_OTHER);
    }
    assert_eq!(app.unanswered_count(erin_id).await, 60);
    assert_eq!(app.user_count().await, users_before + 10);
}
