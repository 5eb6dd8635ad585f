use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

pub const SAMPLE_CSV: &str = concat!(
    "User Name,Email,Google Cloud Skills Boost Profile URL,# of Skill Badges,Names of Skill Badges,# of Arcade Games,Names of Completed Arcade Games\n",
    "Alice,alice@example.com,https://www.cloudskillsboost.google.com/public_profiles/a,5,\"Badge A, Badge B\",1,Arcade Trivia\n",
    ",,,,,,\n",
    "Bob,,https://www.cloudskillsboost.google.com/public_profiles/b,3,Badge A,0,\n",
    "   ,ghost@example.com,,9,,9,\n",
);

pub struct TestServer {
    child: Child,
    port: u16,
    dir: PathBuf,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let port = free_port();
        let dir = std::env::temp_dir().join(format!("arcade-board-it-{}-{}", std::process::id(), port));
        std::fs::create_dir_all(dir.join("data")).expect("create static dir");
        std::fs::write(dir.join("data/progress_data.csv"), SAMPLE_CSV).expect("write csv");
        std::fs::write(dir.join("board.css"), "body { margin: 0; }\n").expect("write css");

        let child = Command::new(env!("CARGO_BIN_EXE_arcade-board"))
            .env("PORT", port.to_string())
            .env("STATIC_DIR", &dir)
            .env("CSV_PATH", dir.join("data/progress_data.csv"))
            .env_remove("CSV_SOURCE_URL")
            .env_remove("CSV_URL")
            .env("RUST_LOG", "arcade_board=warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn arcade-board");

        let server = Self { child, port, dir };
        server.wait_ready().await;
        server
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    async fn wait_ready(&self) {
        let client = reqwest::Client::new();
        for _ in 0..100 {
            if let Ok(response) = client.get(format!("{}/health", self.base_url())).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("arcade-board did not become ready");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("free port")
}
