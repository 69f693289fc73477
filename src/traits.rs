pub trait AsString {
  fn as_string_option(&self) -> Option<String>;
}

impl AsString for json::JsonValue {
  fn as_string_option(&self) -> Option<String> {
    match *self {
      json::JsonValue::Short(ref value)  => Some(value.to_string()),
      json::JsonValue::String(ref value) => Some(value.to_string()),
      _                                  => None,
    }
  }
}
