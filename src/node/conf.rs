//! Daemon conf file rendering and writing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RpcConfig;
use crate::node::types::ConfWriteError;

/// Path of the conf file for `chain` inside `node_dir`.
pub fn conf_path(node_dir: &Path, chain: &str) -> PathBuf {
    node_dir.join(format!("{}.conf", chain))
}

/// Render the conf file contents.
pub fn render_conf(rpc: &RpcConfig) -> String {
    format!(
        "rpcuser={}\nrpcpassword={}\nrpcport={}\nrpcbind={}\nrpcallowip={}\n",
        rpc.user, rpc.password, rpc.port, rpc.bind, rpc.allow_ip
    )
}

/// Create `node_dir` if needed and (over)write `<node_dir>/<chain>.conf`.
///
/// Returns the path written.
pub fn write_conf(
    node_dir: &Path,
    chain: &str,
    rpc: &RpcConfig,
) -> Result<PathBuf, ConfWriteError> {
    fs::create_dir_all(node_dir).map_err(|source| ConfWriteError::CreateDir {
        path: node_dir.to_path_buf(),
        source,
    })?;

    let path = conf_path(node_dir, chain);
    fs::write(&path, render_conf(rpc)).map_err(|source| ConfWriteError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), rpc_port = rpc.port, "Config is ready");
    Ok(path)
}
