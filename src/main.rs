use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let Some(content_id) = std::env::args().nth(1) else {
        eprintln!("usage: guest_views <content-id>");
        return ExitCode::from(2);
    };

    match guest_views::run_with_config(content_id).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
