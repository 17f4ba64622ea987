//! Unit tests for the CloudFormation SDK stack describer, served by a local
//! HTTP endpoint that answers every request with one canned response.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use agentdeploy_cli::application::ports::StackDescriber;
use agentdeploy_cli::application::services::bootstrap::check_bootstrap_status;
use agentdeploy_cli::application::services::stack_status::check_stack_status;
use agentdeploy_cli::domain::{format_error, is_stack_not_found};
use agentdeploy_cli::infra::cloudformation::CloudFormationStackDescriber;
use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use aws_sdk_cloudformation::config::Credentials;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const XMLNS: &str = "http://cloudformation.amazonaws.com/doc/2010-05-15/";

fn describe_ok(status: &str) -> String {
    format!(
        r#"<DescribeStacksResponse xmlns="{XMLNS}">
  <DescribeStacksResult>
    <Stacks>
      <member>
        <StackName>AgentStack</StackName>
        <StackId>arn:aws:cloudformation:us-east-1:123456789012:stack/AgentStack/1</StackId>
        <CreationTime>2024-01-01T00:00:00Z</CreationTime>
        <StackStatus>{status}</StackStatus>
        <Outputs>
          <member>
            <OutputKey>RuntimeArn</OutputKey>
            <OutputValue>arn:aws:bedrock-agentcore:us-east-1:123456789012:runtime/x</OutputValue>
          </member>
        </Outputs>
      </member>
    </Stacks>
  </DescribeStacksResult>
  <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>
</DescribeStacksResponse>"#
    )
}

fn error_body(code: &str, message: &str) -> String {
    format!(
        r#"<ErrorResponse xmlns="{XMLNS}">
  <Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error>
  <RequestId>req-2</RequestId>
</ErrorResponse>"#
    )
}

/// Local endpoint replaying one response; keeps every raw request it saw.
struct CannedEndpoint {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedEndpoint {
    async fn start(status: u16, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                seen.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        Self { url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Read one request: headers, then `Content-Length` bytes of body.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            break;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn describer_for(url: &str) -> CloudFormationStackDescriber {
    let config = aws_sdk_cloudformation::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(url)
        .retry_config(RetryConfig::disabled())
        .build();
    CloudFormationStackDescriber::new(config)
}

#[tokio::test]
async fn test_describe_reads_status_and_outputs() {
    let endpoint = CannedEndpoint::start(200, describe_ok("UPDATE_COMPLETE")).await;
    let describer = describer_for(&endpoint.url);

    let description = describer
        .describe_stack("us-east-1", "AgentStack")
        .await
        .expect("describe");

    assert_eq!(description.status.as_deref(), Some("UPDATE_COMPLETE"));
    assert!(description.outputs.contains_key("RuntimeArn"));
    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("Action=DescribeStacks"), "{}", requests[0]);
    assert!(requests[0].contains("StackName=AgentStack"), "{}", requests[0]);
}

#[tokio::test]
async fn test_region_is_chosen_per_query() {
    let endpoint = CannedEndpoint::start(200, describe_ok("CREATE_COMPLETE")).await;
    let describer = describer_for(&endpoint.url);

    describer.describe_stack("eu-west-1", "AgentStack").await.expect("first");
    describer.describe_stack("ap-southeast-2", "AgentStack").await.expect("second");

    let requests = endpoint.requests();
    assert!(requests[0].contains("/eu-west-1/cloudformation/aws4_request"), "{}", requests[0]);
    assert!(requests[1].contains("/ap-southeast-2/cloudformation/aws4_request"), "{}", requests[1]);
}

#[tokio::test]
async fn test_validation_error_code_maps_to_not_found() {
    let body = error_body("ValidationError", "Stack with id AgentStack does not exist");
    let endpoint = CannedEndpoint::start(400, body).await;
    let describer = describer_for(&endpoint.url);

    let err = describer
        .describe_stack("us-east-1", "AgentStack")
        .await
        .unwrap_err();

    assert!(is_stack_not_found(&err), "{err:#}");
    let result = check_stack_status(&describer, "us-east-1", "AgentStack")
        .await
        .expect("absent stack is deployable");
    assert!(!result.exists);
    assert!(result.can_deploy);
}

#[tokio::test]
async fn test_not_found_wording_under_another_code_propagates() {
    let body = error_body("AccessDenied", "ValidationError: profile 'x' does not exist");
    let endpoint = CannedEndpoint::start(403, body).await;
    let describer = describer_for(&endpoint.url);

    let err = check_stack_status(&describer, "us-east-1", "AgentStack")
        .await
        .unwrap_err();

    assert!(!is_stack_not_found(&err));
    let rendered = format_error(&err);
    assert!(rendered.contains("describe-stacks failed for AgentStack in us-east-1"), "{rendered}");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_query_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let describer = describer_for(&url);

    let err = check_bootstrap_status(&describer, "us-east-1").await.unwrap_err();

    assert!(!is_stack_not_found(&err));
}

#[tokio::test]
async fn test_bootstrap_queries_toolkit_stack() {
    let endpoint = CannedEndpoint::start(200, describe_ok("UPDATE_ROLLBACK_COMPLETE")).await;
    let describer = describer_for(&endpoint.url);

    let status = check_bootstrap_status(&describer, "us-west-2").await.expect("status");

    assert!(status.is_bootstrapped);
    assert!(endpoint.requests()[0].contains("StackName=CDKToolkit"));
}
