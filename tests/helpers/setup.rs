use onboarding_calendar_api::Application;
use onboarding_calendar_infra::{setup_context, Config};
use onboarding_calendar_sdk::CalendarSDK;

pub struct TestApp {
    pub config: Config,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, CalendarSDK, String) {
    let mut ctx = setup_context().await;
    ctx.config.port = 0; // Random port
    ctx.config.default_timezone = chrono_tz::UTC;

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config };
    let sdk = CalendarSDK::new(address.clone());
    (app, sdk, address)
}
