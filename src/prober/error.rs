use std::fmt::Write;

use thiserror::Error;

/// Terminal failure of a single probe run. User-facing messages keep the
/// original Chinese wording the frontend displays verbatim.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("测试URL必须是HTTPS协议（测试页面为HTTPS，不支持混合内容）")]
    Validation,

    #[error("请求超时（{timeout_seconds}秒）：目标URL {url} 响应过慢，或测试节点IP被拦截")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("SSL证书错误：目标URL的HTTPS证书无效/过期，无法建立安全连接")]
    Tls,

    #[error("连接被拒绝：目标URL服务器拦截了测试节点的请求（反爬虫/防盗链）")]
    ConnectionRefused,

    #[error("域名解析失败：目标URL不存在或DNS配置错误")]
    Dns,

    #[error("访问目标URL失败：{0}（建议更换测试URL，如https://www.aliyun.com）")]
    Transport(String),
}

/// Flattens an error and its sources into a single string, so transport
/// failures can be matched on markers that only appear deeper in the chain.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}

/// Maps a reqwest transport failure onto the probe error taxonomy. Structured
/// indicators are checked first; the source-chain text is only consulted for
/// conditions reqwest does not expose as a kind.
pub(crate) fn classify(err: reqwest::Error, url: &str, timeout_seconds: u64) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::Timeout {
            url: url.to_string(),
            timeout_seconds,
        };
    }

    let chain = report(&err);
    match classify_chain(&chain) {
        Some(classified) => classified,
        None => ProbeError::Transport(chain),
    }
}

fn classify_chain(chain: &str) -> Option<ProbeError> {
    let lower = chain.to_lowercase();

    if lower.contains("certificate") || lower.contains("ssl") || lower.contains("tls") {
        Some(ProbeError::Tls)
    } else if lower.contains("connection refused") || lower.contains("econnrefused") {
        Some(ProbeError::ConnectionRefused)
    } else if lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("enotfound")
    {
        Some(ProbeError::Dns)
    } else {
        None
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_certificate_markers_map_to_tls() {
        let chain = "error sending request: invalid peer certificate: Expired";
        assert!(matches!(classify_chain(chain), Some(ProbeError::Tls)));

        let chain = "SSL handshake failed";
        assert!(matches!(classify_chain(chain), Some(ProbeError::Tls)));
    }

    #[test]
    fn test_refused_markers_map_to_connection_refused() {
        let chain = "client error (Connect): tcp connect error: Connection refused (os error 111)";
        assert!(matches!(
            classify_chain(chain),
            Some(ProbeError::ConnectionRefused)
        ));
    }

    #[test]
    fn test_dns_markers_map_to_dns() {
        let chain =
            "client error (Connect): dns error: failed to lookup address information: Name or service not known";
        assert!(matches!(classify_chain(chain), Some(ProbeError::Dns)));
    }

    #[test]
    fn test_unrecognized_chain_is_not_classified() {
        assert!(classify_chain("connection reset by peer").is_none());
    }

    #[test]
    fn test_timeout_message_names_url_and_bound() {
        let err = ProbeError::Timeout {
            url: "https://example.com".to_string(),
            timeout_seconds: 15,
        };
        let msg = err.to_string();
        assert!(msg.contains("15"));
        assert!(msg.contains("https://example.com"));
    }

    #[test]
    fn test_validation_message_names_https() {
        assert!(ProbeError::Validation.to_string().contains("HTTPS"));
    }

    #[test]
    fn test_report_flattens_source_chain() {
        use std::fmt;

        #[derive(Debug)]
        struct Outer(Inner);
        #[derive(Debug)]
        struct Inner;

        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "outer failed")
            }
        }
        impl fmt::Display for Inner {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "inner cause")
            }
        }
        impl std::error::Error for Inner {}
        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        assert_eq!(report(&Outer(Inner)), "outer failed: inner cause");
    }
}
