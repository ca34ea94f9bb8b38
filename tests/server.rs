use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::{sleep, timeout};
use tollgate::{Request, Server};

const ADDR: &str = "127.0.0.1:38471";

async fn connect() -> TcpStream {
    for _ in 0..50 {
        if let Ok(stream) = TcpStream::connect(ADDR).await {
            return stream;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not start on {ADDR}");
}

async fn page(req: Request) -> String {
    format!("path={}", req.path())
}

#[tokio::test]
async fn answers_without_waiting_for_the_request_body() {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        Server::bind(ADDR)
            .serve_until(page, async {
                let _ = stop_rx.await;
            })
            .await
    });

    let mut stream = connect().await;
    // Declares a gigabyte and sends none of it.
    stream
        .write_all(b"POST /my%20page HTTP/1.1\r\nhost: test\r\ncontent-length: 1000000000\r\n\r\n")
        .await
        .unwrap();

    let mut reply = String::new();
    let mut buf = vec![0u8; 1024];
    while !reply.ends_with("path=/my page") {
        let n = timeout(Duration::from_secs(5), stream.read(&mut buf))
            .await
            .expect("no response while the body was outstanding")
            .unwrap();
        if n == 0 {
            break;
        }
        reply.push_str(&String::from_utf8_lossy(&buf[..n]));
    }

    assert!(reply.starts_with("HTTP/1.1 200"), "{reply}");
    assert!(reply.ends_with("path=/my page"), "{reply}");

    drop(stream);
    stop_tx.send(()).unwrap();
    timeout(Duration::from_secs(5), server).await.unwrap().unwrap().unwrap();
}
