#![allow(dead_code)]

pub mod recording {
    use http::Method;
    use restmodels::binding::{CallArgs, Client};
    use serde_json::Value;
    use std::sync::Mutex;

    /// One request seen by [`RecordingClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub method: Method,
        pub path: String,
        pub query: CallArgs,
        pub body: Option<Value>,
    }

    /// In-memory transport: records every request and answers with a canned body.
    pub struct RecordingClient {
        response: Value,
        requests: Mutex<Vec<Recorded>>,
    }

    impl RecordingClient {
        pub fn answering(response: Value) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last(&self) -> Recorded {
            self.requests().pop().expect("at least one request")
        }
    }

    impl Client for RecordingClient {
        fn request(
            &self,
            method: &Method,
            path: &str,
            query: &CallArgs,
            body: Option<&Value>,
        ) -> anyhow::Result<Value> {
            self.requests.lock().unwrap().push(Recorded {
                method: method.clone(),
                path: path.to_string(),
                query: query.clone(),
                body: body.cloned(),
            });
            Ok(self.response.clone())
        }
    }
}

pub mod mock_server {
    use std::io::Read;
    use std::thread::{self, JoinHandle};

    /// One request seen by the mock server.
    #[derive(Debug, Clone)]
    pub struct Captured {
        pub method: String,
        pub url: String,
        pub body: String,
        pub request_id: Option<String>,
        pub user_agent: Option<String>,
    }

    /// Serve `responses` in order, one per request, then stop.
    ///
    /// Returns the base URL and a handle yielding the captured requests.
    pub fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Captured>>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
        let addr = server
            .server_addr()
            .to_ip()
            .expect("mock server listens on an IP address");
        let handle = thread::spawn(move || {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let mut request = server.recv().expect("receive request");
                let header = |name: &str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                        .map(|h| h.value.as_str().to_string())
                };
                let request_id = header("X-Request-Id");
                let user_agent = header("User-Agent");
                let mut text = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut text)
                    .expect("read request body");
                captured.push(Captured {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body: text,
                    request_id,
                    user_agent,
                });
                let response = tiny_http::Response::from_string(body).with_status_code(status);
                request.respond(response).expect("send response");
            }
            captured
        });
        (format!("http://{addr}"), handle)
    }
}
