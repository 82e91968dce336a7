//! Routing of named host method calls to adapter commands.

use crate::adapter::WebViewAdapter;
use crate::channel::MethodResult;
use crate::error::MethodError;
use serde_json::Value;
use thiserror::Error;

/// A parsed host command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Navigate { url: String },
    AddScriptToExecuteOnDocumentCreated { java_script: String },
    SetApplicationNameForUserAgent { name: String },
    GoBack,
    GoForward,
    Reload,
    Stop,
    GetAllCookies,
    OpenDevToolsWindow,
    ExecuteJavaScript { java_script: String },
    PostWebMessageAsString { message: String },
    PostWebMessageAsJson { message: String },
    CanGoBack,
    CanGoForward,
    UpdateBounds,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("invalid arguments for {0}")]
    InvalidArguments(String),
}

impl Command {
    /// Parses a method call. String arguments may be passed bare or in a map
    /// under their key.
    pub fn parse(method: &str, arguments: &Value) -> Result<Self, DispatchError> {
        let string = |key: &str| {
            string_argument(arguments, key)
                .ok_or_else(|| DispatchError::InvalidArguments(method.to_string()))
        };

        let command = match method {
            "navigate" => Command::Navigate { url: string("url")? },
            "addScriptToExecuteOnDocumentCreated" => Command::AddScriptToExecuteOnDocumentCreated {
                java_script: string("javaScript")?,
            },
            "setApplicationNameForUserAgent" => Command::SetApplicationNameForUserAgent {
                name: string("name")?,
            },
            "goBack" => Command::GoBack,
            "goForward" => Command::GoForward,
            "reload" => Command::Reload,
            "stop" => Command::Stop,
            "getAllCookies" => Command::GetAllCookies,
            "openDevToolsWindow" => Command::OpenDevToolsWindow,
            "executeJavaScript" => Command::ExecuteJavaScript {
                java_script: string("javaScript")?,
            },
            "postWebMessageAsString" => Command::PostWebMessageAsString {
                message: string("message")?,
            },
            "postWebMessageAsJson" => Command::PostWebMessageAsJson {
                message: string("message")?,
            },
            "canGoBack" => Command::CanGoBack,
            "canGoForward" => Command::CanGoForward,
            "updateBounds" => Command::UpdateBounds,
            other => return Err(DispatchError::UnknownMethod(other.to_string())),
        };
        Ok(command)
    }
}

fn string_argument(arguments: &Value, key: &str) -> Option<String> {
    match arguments {
        Value::String(value) => Some(value.clone()),
        Value::Object(map) => map.get(key)?.as_str().map(str::to_owned),
        _ => None,
    }
}

impl WebViewAdapter {
    /// Handles one host method call, answering through `result`.
    pub fn handle_method_call(&self, method: &str, arguments: &Value, result: MethodResult) {
        match Command::parse(method, arguments) {
            Ok(command) => self.execute(command, result),
            Err(DispatchError::UnknownMethod(_)) => result.not_implemented(),
            Err(err) => result.error(MethodError::generic(err.to_string())),
        }
    }

    /// Runs a command. Fire-and-forget commands answer with null.
    pub fn execute(&self, command: Command, result: MethodResult) {
        match command {
            Command::Navigate { url } => {
                self.navigate(&url);
                result.success_empty();
            }
            Command::AddScriptToExecuteOnDocumentCreated { java_script } => {
                self.add_script_to_execute_on_document_created(&java_script);
                result.success_empty();
            }
            Command::SetApplicationNameForUserAgent { name } => {
                self.set_application_name_for_user_agent(&name);
                result.success_empty();
            }
            Command::GoBack => {
                self.go_back();
                result.success_empty();
            }
            Command::GoForward => {
                self.go_forward();
                result.success_empty();
            }
            Command::Reload => {
                self.reload();
                result.success_empty();
            }
            Command::Stop => {
                self.stop();
                result.success_empty();
            }
            Command::GetAllCookies => self.get_all_cookies(result),
            Command::OpenDevToolsWindow => {
                self.open_dev_tools_window();
                result.success_empty();
            }
            Command::ExecuteJavaScript { java_script } => {
                self.execute_java_script(&java_script, result)
            }
            Command::PostWebMessageAsString { message } => {
                self.post_web_message_as_string(&message, result)
            }
            Command::PostWebMessageAsJson { message } => {
                self.post_web_message_as_json(&message, result)
            }
            Command::CanGoBack => result.success(Value::Bool(self.can_go_back())),
            Command::CanGoForward => result.success(Value::Bool(self.can_go_forward())),
            Command::UpdateBounds => {
                self.update_bounds();
                result.success_empty();
            }
        }
    }
}
