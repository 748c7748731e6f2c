use anyhow::Result;
use fms_core::config::Config;

pub fn run(config: Config, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!("FMS check-in proxy → http://localhost:{actual_port}/api/fms");

        tokio::select! {
            res = fms_server::serve_on(config, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
