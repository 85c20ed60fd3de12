//! 인증 요청 DTO
//!
//! 인증 백엔드로 전송되는 요청 본문을 정의합니다.
//! 전송 전에 `validator`로 입력값을 검증합니다.
use serde::Serialize;
use validator::Validate;

use crate::domain::models::session::CustomerId;

/// 로그인 요청 구조체 (`POST /auth/login`)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 회원가입 요청 구조체 (`POST /auth/register`)
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "성은 1-100자 사이여야 합니다"))]
    pub last_name: String,

    /// 고객 계정으로 가입하는지 여부
    pub is_customer: bool,

    /// 기존 고객 레코드에 연결할 경우의 고객 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest { email: "a@b.com".to_string(), password: "pw".to_string() };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest { email: "not-an-email".to_string(), password: "pw".to_string() };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest { email: "a@b.com".to_string(), password: String::new() };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_register_request_serializes_camel_case() {
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            is_customer: true,
            customer_id: Some(CustomerId::Number(3)),
        };
        assert!(request.validate().is_ok());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["isCustomer"], true);
        assert_eq!(json["customerId"], 3);
    }
}
