#[actix_web::main]
async fn main() -> std::io::Result<()> {
    compliance_dashboard_lib::run().await
}
