#[actix_web::main]
async fn main() -> std::io::Result<()> {
    report_agent_lib::app::run().await
}
