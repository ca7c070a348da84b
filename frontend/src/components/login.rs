use crate::auth;
use crate::web::actions::ActionEvent;
use crate::web::route::AppRoute;
use crate::web::router::{Router, ViewContext, ViewInitializer};

pub const LOGIN_ACTION: &str = "login";

pub struct LoginPage;

#[async_trait::async_trait(?Send)]
impl ViewInitializer for LoginPage {
    async fn init(&self, cx: &ViewContext) {
        // 片段可能已被更新的导航替换
        if !cx.mount().has_action(LOGIN_ACTION) {
            log_info!("[Login] 未找到登录表单，跳过初始化");
            return;
        }

        let router = cx.router.clone();
        cx.router.actions().register(LOGIN_ACTION, move |event: ActionEvent| {
            let router = router.clone();
            async move { submit(&router, &event).await }
        });
    }
}

async fn submit(router: &Router, event: &ActionEvent) {
    let email = event.field("email").trim();
    let password = event.field("password");

    if email.is_empty() || password.is_empty() {
        router.mount().notify("Please fill in all fields");
        return;
    }

    match auth::login(router.store(), router.sessions(), email, password).await {
        Some(_) => {
            router
                .navigate(AppRoute::auth_success_redirect().to_path())
                .await;
        }
        None => router.mount().notify("Invalid email or password"),
    }
}
