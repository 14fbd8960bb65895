use crate::transport::{HttpReply, TransportError};

/// Coarse band of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx, and anything else up to 399 (redirects count as success).
    Success,
    /// 400..=499: the request itself is wrong, retrying will not help.
    ClientError,
    /// 500 and above: worth retrying after a backoff.
    ServerError,
}

impl ResponseClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, ResponseClass::ServerError)
    }
}

/// Split the status line at 399/500.
pub fn classify(status: u16) -> ResponseClass {
    match status {
        0..=399 => ResponseClass::Success,
        500.. => ResponseClass::ServerError,
        _ => ResponseClass::ClientError,
    }
}

/// Outcome of one call, ready to be fed into a backoff controller.
#[derive(Debug)]
pub enum ClassifiedResponse {
    Success { status: u16, body: String },
    ClientError { status: u16, body: String },
    ServerError { status: u16 },
    TransportFailure(TransportError),
}

impl ClassifiedResponse {
    pub fn from_result(result: Result<HttpReply, TransportError>) -> Self {
        match result {
            Ok(HttpReply { status, body }) => match classify(status) {
                ResponseClass::Success => ClassifiedResponse::Success { status, body },
                ResponseClass::ClientError => ClassifiedResponse::ClientError { status, body },
                ResponseClass::ServerError => ClassifiedResponse::ServerError { status },
            },
            Err(err) => ClassifiedResponse::TransportFailure(err),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClassifiedResponse::Success { status, .. }
            | ClassifiedResponse::ClientError { status, .. }
            | ClassifiedResponse::ServerError { status } => Some(*status),
            ClassifiedResponse::TransportFailure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_partition_the_status_line() {
        for code in 0u16..=999 {
            let class = classify(code);
            let expected = if code <= 399 {
                ResponseClass::Success
            } else if code >= 500 {
                ResponseClass::ServerError
            } else {
                ResponseClass::ClientError
            };
            assert_eq!(class, expected, "status {code}");
        }
    }

    #[test]
    fn band_edges() {
        assert_eq!(classify(200), ResponseClass::Success);
        assert_eq!(classify(301), ResponseClass::Success);
        assert_eq!(classify(399), ResponseClass::Success);
        assert_eq!(classify(400), ResponseClass::ClientError);
        assert_eq!(classify(404), ResponseClass::ClientError);
        assert_eq!(classify(499), ResponseClass::ClientError);
        assert_eq!(classify(500), ResponseClass::ServerError);
        assert_eq!(classify(503), ResponseClass::ServerError);
        assert_eq!(classify(u16::MAX), ResponseClass::ServerError);
    }

    #[test]
    fn only_server_errors_are_retryable() {
        assert!(ResponseClass::ServerError.is_retryable());
        assert!(!ResponseClass::ClientError.is_retryable());
        assert!(!ResponseClass::Success.is_retryable());
    }

    #[test]
    fn from_result_keeps_body_where_it_is_routed() {
        let ok = ClassifiedResponse::from_result(Ok(HttpReply { status: 200, body: "{}".into() }));
        assert!(matches!(ok, ClassifiedResponse::Success { status: 200, ref body } if body == "{}"));

        let missing =
            ClassifiedResponse::from_result(Ok(HttpReply { status: 404, body: "nope".into() }));
        assert!(matches!(missing, ClassifiedResponse::ClientError { status: 404, .. }));
        assert_eq!(missing.status(), Some(404));

        let down = ClassifiedResponse::from_result(Ok(HttpReply { status: 502, body: "".into() }));
        assert!(matches!(down, ClassifiedResponse::ServerError { status: 502 }));

        let failed = ClassifiedResponse::from_result(Err(TransportError::Timeout));
        assert!(matches!(failed, ClassifiedResponse::TransportFailure(TransportError::Timeout)));
        assert_eq!(failed.status(), None);
    }
}
