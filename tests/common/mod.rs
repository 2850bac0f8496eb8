use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::Path;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn webwatch_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("webwatch");
    cmd.arg("-C").arg(cwd);
    cmd
}

/// Starts a mock HTTP server on a runtime owned by the test. The runtime
/// must stay alive for as long as the server is used; the binary under test
/// talks to the server from its own process.
pub fn start_server() -> (Runtime, MockServer) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

/// Replaces the server's response to GET / with the given status and body.
// Each integration test file is compiled as its own crate, and not every
// crate uses every helper here.
#[allow(dead_code)]
pub fn serve(rt: &Runtime, server: &MockServer, status: u16, html: &str) {
    rt.block_on(async {
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_string(html))
            .mount(server)
            .await;
    });
}

/// Writes a webwatch.toml in `dir` with mail disabled and one watch
/// labeled "example" pointed at `url`, returning nothing; the binary is
/// expected to be run with `-C dir` so the default config path applies.
#[allow(dead_code)]
pub fn write_config(dir: &Path, url: &str, selector: &str) {
    write_config_with_settings(dir, url, selector, "");
}

#[allow(dead_code)]
pub fn write_config_with_settings(dir: &Path, url: &str, selector: &str, extra_settings: &str) {
    let config = format!(
        r#"
[settings]
state_file = "state.toml"
timeout_secs = 5
{extra_settings}

[mail]
enabled = false

[[watch]]
label = "example"
url = "{url}"
selector = "{selector}"
"#
    );
    fs::write(dir.join("webwatch.toml"), config).unwrap();
}
