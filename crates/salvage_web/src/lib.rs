use salvage_core::core_api::{
    AnalysisResponse, CoreError, PlannerState, ServiceErrorBody, common_salvage,
};
use salvage_core::{ReprocessingEfficiency, SalvageItem, parse_inventory_text};
use salvage_render::{
    JsonStyle, TextRenderOptions, render_analysis_json, render_analysis_text, render_items_json,
    render_items_text,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze salvage";

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        Self::new(err.code.as_str(), err.message)
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| WebError::new("render_failed", err.to_string()).to_js_value())
}

/// Parses pasted inventory text into `[{name, quantity}]`.
#[wasm_bindgen]
pub fn parse_inventory(text: &str) -> Result<JsValue, JsValue> {
    to_js(&parse_inventory_text(text))
}

/// Quick-add names matching `prefix`.
#[wasm_bindgen]
pub fn common_salvage_names(prefix: &str) -> Result<JsValue, JsValue> {
    to_js(&common_salvage::suggest(prefix))
}

/// Planner session for a static page. The page performs the HTTP call
/// itself: `beginAnalysis` hands it the request body and the outcome comes
/// back through `acceptResponse` or `acceptFailure`.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WebPlanner {
    state: PlannerState,
}

#[wasm_bindgen]
impl WebPlanner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&mut self, name: &str, quantity: u32) -> Result<(), JsValue> {
        self.add_item_impl(name, quantity)
            .map_err(|err| err.to_js_value())
    }

    /// Returns how many rows were added.
    #[wasm_bindgen(js_name = addPasted)]
    pub fn add_pasted(&mut self, text: &str) -> Result<usize, JsValue> {
        self.add_pasted_impl(text).map_err(|err| err.to_js_value())
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&mut self, index: usize) {
        self.state.remove_item(index);
    }

    pub fn clear(&mut self) {
        self.state.clear();
    }

    #[wasm_bindgen(js_name = setEfficiency)]
    pub fn set_efficiency(&mut self, value: f64) -> Result<(), JsValue> {
        self.set_efficiency_impl(value)
            .map_err(|err| err.to_js_value())
    }

    #[wasm_bindgen(js_name = efficiencyLabel)]
    pub fn efficiency_label(&self) -> String {
        self.state.efficiency().label().to_string()
    }

    pub fn items(&self) -> Result<JsValue, JsValue> {
        to_js(self.state.items().items())
    }

    #[wasm_bindgen(js_name = beginAnalysis)]
    pub fn begin_analysis(&mut self) -> Result<String, JsValue> {
        self.begin_analysis_impl().map_err(|err| err.to_js_value())
    }

    #[wasm_bindgen(js_name = acceptResponse)]
    pub fn accept_response(&mut self, body: &str) -> Result<(), JsValue> {
        self.accept_response_impl(body)
            .map_err(|err| err.to_js_value())
    }

    /// Records a failed call. `status` 0 means the request never got a
    /// response.
    #[wasm_bindgen(js_name = acceptFailure)]
    pub fn accept_failure(&mut self, status: u16, body: &str) -> String {
        self.accept_failure_impl(status, body)
    }

    #[wasm_bindgen(js_name = renderText)]
    pub fn render_text(&self, verbose: bool) -> String {
        self.render_text_impl(verbose)
    }

    #[wasm_bindgen(js_name = renderJson)]
    pub fn render_json(&self) -> Result<String, JsValue> {
        self.render_json_impl().map_err(|err| err.to_js_value())
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().map(str::to_string)
    }
}

impl WebPlanner {
    fn add_item_impl(&mut self, name: &str, quantity: u32) -> Result<(), WebError> {
        let item = SalvageItem::new(name, quantity)?;
        self.state.add_item(item);
        Ok(())
    }

    fn add_pasted_impl(&mut self, text: &str) -> Result<usize, WebError> {
        Ok(self.state.add_pasted(text)?)
    }

    fn set_efficiency_impl(&mut self, value: f64) -> Result<(), WebError> {
        self.state.set_efficiency(ReprocessingEfficiency::new(value)?);
        Ok(())
    }

    fn begin_analysis_impl(&mut self) -> Result<String, WebError> {
        let request = self.state.begin_analysis()?;
        serde_json::to_string(&request).map_err(|err| {
            WebError::new(
                "render_failed",
                format!("failed to serialize analysis request: {err}"),
            )
        })
    }

    fn accept_response_impl(&mut self, body: &str) -> Result<(), WebError> {
        match serde_json::from_str::<AnalysisResponse>(body) {
            Ok(response) => {
                self.state.finish_analysis(Ok(response));
                Ok(())
            }
            Err(err) => {
                self.state
                    .finish_analysis(Err(GENERIC_FAILURE_MESSAGE.to_string()));
                Err(WebError::new(
                    "invalid_response",
                    format!("Failed to read analysis response: {err}"),
                ))
            }
        }
    }

    fn accept_failure_impl(&mut self, status: u16, body: &str) -> String {
        let message = failure_message(status, body);
        self.state.finish_analysis(Err(message.clone()));
        message
    }

    fn render_text_impl(&self, verbose: bool) -> String {
        let mut out = render_items_text(self.state.items().items());
        if let Some(response) = self.state.result() {
            out.push('\n');
            out.push_str(&render_analysis_text(response, TextRenderOptions { verbose }));
        }
        out
    }

    fn render_json_impl(&self) -> Result<String, WebError> {
        let value = match self.state.result() {
            Some(response) => render_analysis_json(response, JsonStyle::CanonicalV1),
            None => render_items_json(self.state.items().items()),
        };
        serde_json::to_string_pretty(&value).map_err(|err| {
            WebError::new(
                "render_failed",
                format!("failed to serialize rendered JSON output: {err}"),
            )
        })
    }
}

fn failure_message(status: u16, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_string))
    {
        return message;
    }
    if status == 0 {
        return GENERIC_FAILURE_MESSAGE.to_string();
    }
    format!("Request failed with status code {status}")
}
