use crate::auth;
use crate::web::actions::ActionEvent;
use crate::web::route::AppRoute;
use crate::web::router::{Router, ViewContext, ViewInitializer};

pub const REGISTER_ACTION: &str = "register";

pub struct RegisterPage;

#[async_trait::async_trait(?Send)]
impl ViewInitializer for RegisterPage {
    async fn init(&self, cx: &ViewContext) {
        if !cx.mount().has_action(REGISTER_ACTION) {
            log_info!("[Register] 未找到注册表单，跳过初始化");
            return;
        }

        let router = cx.router.clone();
        cx.router
            .actions()
            .register(REGISTER_ACTION, move |event: ActionEvent| {
                let router = router.clone();
                async move { submit(&router, &event).await }
            });
    }
}

/// 注册成功即登录，并进入按角色解析的落地页
async fn submit(router: &Router, event: &ActionEvent) {
    let email = event.field("email").trim();
    let password = event.field("password");

    if email.is_empty() || password.is_empty() {
        router.mount().notify("Please fill in all fields");
        return;
    }

    match auth::register(router.store(), router.sessions(), email, password).await {
        Some(_) => {
            router
                .navigate(AppRoute::auth_success_redirect().to_path())
                .await;
        }
        None => router
            .mount()
            .notify("Registration failed: this email may already be registered"),
    }
}
