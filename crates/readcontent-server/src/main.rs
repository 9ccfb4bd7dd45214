use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match readcontent_server::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("readcontent-server: {err}");
            ExitCode::FAILURE
        }
    }
}
