//! Blog pages
//!
//! Each page takes the desk lock for its whole load/mutate/save sequence.
//! Request bodies are read before the lock is taken.

use chrono::{Local, NaiveDate};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::Response;
use minijinja::{context, Value};
use thiserror::Error;

use crate::blog::BlogForm;
use crate::config::AppState;
use crate::error::BlogError;
use crate::handler::router::Route;
use crate::http::{self, BodyError};
use crate::logger;
use crate::templates::{BlogView, ErrorPageContext, FormContext};

/// Anything that turns a page into an error page
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Blog(#[from] BlogError),
    #[error(transparent)]
    Body(#[from] BodyError),
    #[error("failed to render page: {0}")]
    Render(#[from] minijinja::Error),
}

impl PageError {
    const fn status_code(&self) -> u16 {
        match self {
            Self::Blog(e) => e.status_code(),
            Self::Body(BodyError::TooLarge(_)) => 413,
            Self::Body(BodyError::Read(_)) => 400,
            Self::Render(_) => 500,
        }
    }
}

type PageResult = Result<Response<Full<Bytes>>, PageError>;

/// Serve a resolved page, converting failures into error pages
pub async fn serve<B>(route: Route, body: B, state: &AppState, is_head: bool) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match dispatch(route, body, state, is_head).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                logger::log_error(&format!("{route:?}: {e}"));
            } else {
                logger::log_warning(&format!("{route:?}: {e}"));
            }
            error_page(state, status, &e.to_string(), is_head)
        }
    }
}

async fn dispatch<B>(route: Route, body: B, state: &AppState, is_head: bool) -> PageResult
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match route {
        Route::Landing => render(
            state,
            "index.html",
            context! { server_name => &state.config.http.server_name },
            is_head,
        ),
        Route::List => list(state, is_head).await,
        Route::View(index) => view(state, index, is_head).await,
        Route::NewForm => new_form(state, is_head).await,
        Route::NewSubmit => {
            let form = read_form(body, state).await?;
            create(state, form, today()).await
        }
        Route::EditForm(index) => edit_form(state, index, is_head).await,
        Route::EditSubmit(index) => {
            let form = read_form(body, state).await?;
            edit(state, index, form, today(), is_head).await
        }
        Route::Delete(index) => delete(state, index).await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn read_form<B>(body: B, state: &AppState) -> Result<BlogForm, PageError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let bytes = http::read_body(body, limit).await?;
    let fields = http::parse_form(&bytes);
    Ok(BlogForm::from_fields(&fields)?)
}

async fn list(state: &AppState, is_head: bool) -> PageResult {
    let blogs = state.desk.lock().await.list()?;
    render(
        state,
        "blog_list.html",
        context! { blogs => BlogView::list(&blogs) },
        is_head,
    )
}

async fn view(state: &AppState, index: usize, is_head: bool) -> PageResult {
    let blog = state.desk.lock().await.view(index)?;
    logger::log_debug(&format!("Viewing blog {index}: {blog:?}"));
    render(
        state,
        "blog.html",
        context! { blog => BlogView::new(index, &blog) },
        is_head,
    )
}

async fn new_form(state: &AppState, is_head: bool) -> PageResult {
    let known_tags = state.desk.lock().await.tags().tags().to_vec();
    render(
        state,
        "new_blog.html",
        FormContext::blank(&known_tags).to_value(),
        is_head,
    )
}

async fn create(state: &AppState, form: BlogForm, today: NaiveDate) -> PageResult {
    let (index, blog) = state.desk.lock().await.create(form, today)?;
    logger::log_info(&format!("Created blog {} at index {index}", blog.id));
    Ok(http::build_redirect_response(&format!("/blogs/{index}")))
}

async fn edit_form(state: &AppState, index: usize, is_head: bool) -> PageResult {
    let (blog, known_tags) = {
        let desk = state.desk.lock().await;
        (desk.view(index)?, desk.tags().tags().to_vec())
    };
    render(
        state,
        "edit_blog.html",
        FormContext::prefilled(index, &blog, &known_tags).to_value(),
        is_head,
    )
}

async fn edit(
    state: &AppState,
    index: usize,
    form: BlogForm,
    today: NaiveDate,
    is_head: bool,
) -> PageResult {
    let blog = state.desk.lock().await.edit(index, form, today)?;
    logger::log_info(&format!("Updated blog {} at index {index}", blog.id));
    logger::log_debug(&format!("Updated blog contents: {blog:?}"));
    render(
        state,
        "blog.html",
        context! { blog => BlogView::new(index, &blog) },
        is_head,
    )
}

async fn delete(state: &AppState, index: usize) -> PageResult {
    let removed = state.desk.lock().await.delete(index)?;
    logger::log_info(&format!("Deleted blog {} from index {index}", removed.id));
    Ok(http::build_redirect_response("/blogs"))
}

fn render(state: &AppState, template: &str, context: Value, is_head: bool) -> PageResult {
    let html = state.templates.render(template, context)?;
    Ok(http::build_html_response(html, is_head))
}

/// 404 page for paths no route matches
pub fn not_found(state: &AppState, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    error_page(state, 404, &format!("No page at {path}"), is_head)
}

fn error_page(state: &AppState, status: u16, message: &str, is_head: bool) -> Response<Full<Bytes>> {
    let html = state
        .templates
        .render("error.html", ErrorPageContext::new(status, message).to_value())
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to render error page: {e}"));
            fallback_error_html(status)
        });
    http::build_status_html_response(status, html, is_head)
}

fn fallback_error_html(status: u16) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Error {status}</title></head>\
         <body><h1>Error {status}</h1><p><a href=\"/blogs\">Back to all blogs</a></p></body></html>"
    )
}
