// src/web/public_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::student::{NewStudent, RegistrationForm},
    services::student_service,
    state::AppState,
    templates::{IndexPage, RegisterFormValues, RegisterPage},
    web::flash::{set_flash, take_flash, Flash, FlashLevel},
};
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_cookies::Cookies;

// GET /
pub async fn index_page(State(state): State<AppState>, cookies: Cookies) -> AppResult<Html<String>> {
    let page = IndexPage {
        flash: take_flash(&cookies, &state.cookie_key),
    };
    Ok(Html(page.render()?))
}

// GET /register
pub async fn show_register_form() -> AppResult<Html<String>> {
    let page = RegisterPage {
        error: None,
        form: RegisterFormValues::default(),
    };
    Ok(Html(page.render()?))
}

// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<RegistrationForm>,
) -> AppResult<impl IntoResponse> {
    let echoed = RegisterFormValues {
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone().unwrap_or_default(),
        dob: form.dob.clone(),
        address: form.address.clone(),
        course: form.course.clone(),
    };

    let result = match NewStudent::try_from(form) {
        Ok(new_student) => {
            student_service::register_student(&state.db_pool, &state.notifier, &new_student).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(student) => {
            tracing::info!("🎓 Registration {} accepted for course {}", student.id, student.course);
            set_flash(
                &cookies,
                &state.cookie_key,
                Flash::new(FlashLevel::Success, "✅ Application submitted successfully!"),
            );
            Ok(Redirect::to("/").into_response())
        }
        Err(e @ (AppError::Validation(_) | AppError::DuplicateApplicant(_))) => {
            let (status, message) = e.status_and_message();
            tracing::warn!("Registration refused: {}", e);
            let page = RegisterPage {
                error: Some(message),
                form: echoed,
            };
            Ok((status, Html(page.render()?)).into_response())
        }
        Err(e) => Err(e),
    }
}
