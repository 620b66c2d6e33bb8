use actix_web::{web, FromRequest};
use futures_util::future::LocalBoxFuture;
use rand::Rng;
use validator::Validate;

use crate::{api::error, constants::ROOM_NAME_MAX_LENGTH};

const HEX_DIGITS: &[u8] = b"0123456789ABCDEF";

/// Tên ngẫu nhiên cho mỗi kết nối: `User1000`..`User9999`
pub fn random_user_name() -> String {
    format!("User{}", rand::thread_rng().gen_range(1000..=9999))
}

/// Màu ngẫu nhiên dạng `#RRGGBB` (chữ hoa)
pub fn random_color() -> String {
    let mut rng = rand::thread_rng();
    let digits: String =
        (0..6).map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char).collect();
    format!("#{digits}")
}

/// Chuẩn hoá tên room: bỏ khoảng trắng hai đầu, 1..=255 ký tự, không chứa `/`
pub fn normalize_room_name(raw: &str) -> Result<String, error::SystemError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(error::SystemError::bad_request("Room name cannot be empty"));
    }
    if name.chars().count() > ROOM_NAME_MAX_LENGTH {
        return Err(error::SystemError::bad_request(format!(
            "Room name must be at most {ROOM_NAME_MAX_LENGTH} characters long"
        )));
    }
    if name.contains('/') {
        return Err(error::SystemError::bad_request("Room name cannot contain '/'"));
    }
    Ok(name.to_string())
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            Ok(ValidatedJson(model))
        })
    }
}
