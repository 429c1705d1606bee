use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateAttr {
    pub name: String,
    pub value: Option<String>, // boolean attrs allowed, e.g. `disabled`
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: String,
        attrs: Vec<TemplateAttr>,
        children: Vec<Node>,
        self_closing: bool,
    },
    Text(String), // may still contain `{{ expr }}` spans
}
