use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bridge::Parcelable;
use crate::error::Result;
use crate::util::AsAny;

pub const ACTION_GET_CONTENT: &str = "android.intent.action.GET_CONTENT";
pub const ACTION_APPLICATION_DETAILS_SETTINGS: &str = "android.settings.APPLICATION_DETAILS_SETTINGS";

pub const FLAG_ACTIVITY_NEW_TASK: u32 = 0x1000_0000;

#[derive(Debug, Deserialize, Serialize)]
pub enum Extra {
    Bool(bool),
    Int(i64),
    Text(String),
    TextList(Vec<String>),
    Parcel(Box<dyn Parcelable>),
}

impl From<bool> for Extra {
    fn from(value: bool) -> Self {
        Extra::Bool(value)
    }
}

impl From<i64> for Extra {
    fn from(value: i64) -> Self {
        Extra::Int(value)
    }
}

impl From<String> for Extra {
    fn from(value: String) -> Self {
        Extra::Text(value)
    }
}

impl From<&str> for Extra {
    fn from(value: &str) -> Self {
        Extra::Text(value.to_string())
    }
}

impl From<Vec<String>> for Extra {
    fn from(value: Vec<String>) -> Self {
        Extra::TextList(value)
    }
}

/// Description of a screen to start, and of the data a finished screen hands back.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Intent {
    action: Option<String>,
    component: Option<String>,
    data: Option<String>,
    mime_type: Option<String>,
    flags: u32,
    extras: BTreeMap<String, Extra>,
}

impl Intent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_component(component: &str) -> Self {
        Self::new().with_component(component)
    }

    pub fn application_details_settings(package_name: &str) -> Self {
        Self::new()
            .with_action(ACTION_APPLICATION_DETAILS_SETTINGS)
            .with_data(&format!("package:{}", package_name))
            .with_flags(FLAG_ACTIVITY_NEW_TASK)
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_component(mut self, component: &str) -> Self {
        self.component = Some(component.to_string());
        self
    }

    pub fn with_data(mut self, uri: &str) -> Self {
        self.data = Some(uri.to_string());
        self
    }

    pub fn with_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    pub fn put_extra<V: Into<Extra>>(mut self, key: &str, value: V) -> Self {
        self.extras.insert(key.to_string(), value.into());
        self
    }

    pub fn put_parcel<P: Parcelable>(self, key: &str, parcel: P) -> Self {
        self.put_extra(key, Extra::Parcel(Box::new(parcel)))
    }

    pub fn get_action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn get_component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn get_data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn get_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn get_flags(&self) -> u32 {
        self.flags
    }

    pub fn get_extra(&self, key: &str) -> Option<&Extra> {
        self.extras.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.extras.get(key) {
            Some(Extra::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.extras.get(key) {
            Some(Extra::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.extras.get(key) {
            Some(Extra::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_text_list(&self, key: &str) -> Option<&[String]> {
        match self.extras.get(key) {
            Some(Extra::TextList(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_parcel<P: Parcelable>(&self, key: &str) -> Option<&P> {
        match self.extras.get(key) {
            Some(Extra::Parcel(parcel)) => (**parcel).as_any().downcast_ref::<P>(),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Parcelable, PartialEq, Serialize)]
    struct Cat {
        name: String,
        lives: u8,
    }

    #[test]
    fn test_typed_extras() {
        let intent = Intent::new()
            .put_extra("count", 3i64)
            .put_extra("name", "Tom")
            .put_extra("permissions", vec!["a".to_string(), "b".to_string()])
            .put_extra("ok", true);

        assert_eq!(intent.get_int("count"), Some(3));
        assert_eq!(intent.get_text("name"), Some("Tom"));
        assert_eq!(intent.get_text_list("permissions").map(|p| p.len()), Some(2));
        assert_eq!(intent.get_bool("ok"), Some(true));

        // Wrong kind or missing key
        assert_eq!(intent.get_int("name"), None);
        assert_eq!(intent.get_text("missing"), None);
    }

    #[test]
    fn test_settings_intent() {
        let intent = Intent::application_details_settings("com.example.cats");

        assert_eq!(intent.get_action(), Some(ACTION_APPLICATION_DETAILS_SETTINGS));
        assert_eq!(intent.get_data(), Some("package:com.example.cats"));
        assert_eq!(intent.get_flags() & FLAG_ACTIVITY_NEW_TASK, FLAG_ACTIVITY_NEW_TASK);
    }

    #[test]
    fn test_parcel_survives_the_wire() {
        let intent = Intent::for_component("CatListScreen")
            .with_type("image/*")
            .put_parcel("cat", Cat { name: "Tom".into(), lives: 9 });

        let bytes = intent.to_bytes().expect("Can't encode intent");
        let decoded = Intent::from_bytes(&bytes).expect("Can't decode intent");

        assert_eq!(decoded.get_component(), Some("CatListScreen"));
        assert_eq!(decoded.get_type(), Some("image/*"));
        assert_eq!(decoded.get_parcel::<Cat>("cat"), Some(&Cat { name: "Tom".into(), lives: 9 }));
    }

    #[test]
    fn test_garbage_is_a_codec_error() {
        assert!(matches!(Intent::from_bytes(&[0xff, 0x00]), Err(crate::error::Error::Codec(_))));
    }
}
