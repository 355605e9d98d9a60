//! 测试辅助模块
//!
//! 提供一份覆盖各类控件的 schema 和便捷的表单工厂方法。

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::engine::PhotoTransform;
use crate::types::{TransData, TransformSchema};

// ===== Fixture schema =====

const FIXTURE: &str = r##"{
    "qualifiers": {
        "crop": {
            "prefix": "c",
            "description": "Crop mode",
            "commands": [
                {"command": "fill"},
                {"command": "scale", "details": [
                    {"detail": ":<width>", "range_int": {"min": 1, "max": 4000}, "required": "true"},
                    {"detail": ":<height>", "range_int": {"min": 1, "max": 4000}}
                ]},
                {"command": "thumb", "details": [
                    {"detail": ":<zoom>", "range_float": {"min": 0.1, "max": 2, "default": 1}}
                ]}
            ]
        },
        "gravity": {
            "prefix": "g",
            "commands": [
                {"command": "auto"},
                {"command": "north", "details": [
                    {"detail": ":<offset_x>", "range_int": {},
                     "depends": {"qualifier": "crop", "command": "thumb"}},
                    {"detail": ",<offset_y>", "range_int": {},
                     "depends": {"qualifier": "crop", "command": "thumb"}}
                ]}
            ]
        },
        "effect": {
            "prefix": "e",
            "commands": [
                {"command": "e_colorize", "details": [
                    {"detail": ":<level>", "range_int": {"min": 0, "max": 100}},
                    {"detail": ":rgb:<color>", "range_color": {"default": "#ff0000"}}
                ]},
                {"command": "e_art", "details": [
                    {"detail": ":<filter>", "list_value": [{"value": "athena"}, {"value": "zorro"}]}
                ]}
            ]
        },
        "border": {
            "prefix": "bo",
            "type": "radio",
            "commands": [
                {"value": "A", "details": [
                    {"detail": "<width>", "range_int": {}},
                    {"detail": ",<height>", "range_int": {}}
                ]},
                {"value": "B"}
            ]
        },
        "quality": {
            "prefix": "q",
            "commands": [
                {"command": "q", "details": [
                    {"radio": [
                        {"value": "auto", "detail": ":auto", "radio_value": true},
                        {"value": "", "detail": ":<level>",
                         "range_int": {"min": 1, "max": 100}, "required": "true"}
                    ]}
                ]}
            ]
        }
    }
}"##;

pub fn fixture_schema() -> TransformSchema {
    TransformSchema::from_json_str(FIXTURE).unwrap()
}

/// Sets up a form over [`fixture_schema`] with `data` as the stored values.
pub fn form(data: &[(&str, &str)]) -> PhotoTransform {
    form_with(fixture_schema(), data)
}

/// Sets up a form over an inline schema.
pub fn form_from_json(schema: &str, data: &[(&str, &str)]) -> PhotoTransform {
    form_with(TransformSchema::from_json_str(schema).unwrap(), data)
}

fn form_with(schema: TransformSchema, data: &[(&str, &str)]) -> PhotoTransform {
    let trans_data: TransData = data
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut engine = PhotoTransform::new(Arc::new(schema), trans_data);
    engine.setup().unwrap();
    engine
}
