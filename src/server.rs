use crate::config::WeatherConfig;
use crate::error::{Result, WeatherError};
use crate::mcp::dto::{Tool, ToolCall, ToolResult};
use crate::tools::open_weather::{
    format, GetCurrentWeatherInput, GetWeatherByCoordinatesInput, GetWeatherForecastInput,
    OpenWeatherTools,
};
use jsonschema::JSONSchema;
use serde_json::{json, Value};

struct RegisteredTool {
    descriptor: Tool,
    schema: JSONSchema,
}

/// Immutable tool registry, built once at process start. Arguments are
/// checked against each tool's declared inputSchema before the handler's
/// input struct ever sees them.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    fn build() -> Result<Self> {
        let descriptors = vec![
            Tool {
                name: "get_current_weather".to_string(),
                description: "Get current weather conditions for a city (OpenWeather)".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "location": { "type": "string", "description": "City name, e.g. 'London' or 'London,UK'" },
                        "units": { "type": "string", "enum": ["metric", "imperial", "kelvin"], "description": "Measurement system, defaults to metric" }
                    },
                    "required": ["location"]
                }),
            },
            Tool {
                name: "get_weather_forecast".to_string(),
                description: "Get a 5-day forecast for a city, grouped by date".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "location": { "type": "string", "description": "City name, e.g. 'Paris' or 'Paris,FR'" },
                        "units": { "type": "string", "enum": ["metric", "imperial", "kelvin"], "description": "Measurement system, defaults to metric" }
                    },
                    "required": ["location"]
                }),
            },
            Tool {
                name: "get_weather_by_coordinates".to_string(),
                description: "Get current weather conditions for a latitude/longitude pair".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "latitude": { "type": "number", "minimum": -90, "maximum": 90 },
                        "longitude": { "type": "number", "minimum": -180, "maximum": 180 },
                        "units": { "type": "string", "enum": ["metric", "imperial", "kelvin"], "description": "Measurement system, defaults to metric" }
                    },
                    "required": ["latitude", "longitude"]
                }),
            },
        ];

        let mut tools = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let schema = JSONSchema::compile(&descriptor.input_schema).map_err(|e| {
                WeatherError::config_error(format!(
                    "invalid input schema for {}: {}",
                    descriptor.name, e
                ))
            })?;
            tools.push(RegisteredTool { descriptor, schema });
        }
        Ok(Self { tools })
    }

    pub fn descriptors(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    fn validate(&self, name: &str, arguments: &Value) -> Result<()> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.descriptor.name == name)
            .ok_or_else(|| WeatherError::unknown_tool(name))?;

        if let Err(errors) = tool.schema.validate(arguments) {
            let detail = errors
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(WeatherError::invalid_arguments(detail));
        }
        Ok(())
    }
}

pub struct WeatherServer {
    config: WeatherConfig,
    weather: OpenWeatherTools,
    registry: ToolRegistry,
}

impl WeatherServer {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let weather = OpenWeatherTools::new(&config.provider);
        let registry = ToolRegistry::build()?;
        Ok(Self {
            config,
            weather,
            registry,
        })
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn weather(&self) -> &OpenWeatherTools {
        &self.weather
    }

    pub fn get_tools(&self) -> Vec<Tool> {
        self.registry.descriptors()
    }

    pub async fn handle_tool_call(&self, tool_call: ToolCall) -> Result<ToolResult> {
        tracing::info!("Handling tool call: {}", tool_call.name);
        self.registry.validate(&tool_call.name, &tool_call.arguments)?;

        let content = match tool_call.name.as_str() {
            "get_current_weather" => {
                let input: GetCurrentWeatherInput = serde_json::from_value(tool_call.arguments)
                    .map_err(|e| WeatherError::invalid_arguments(e.to_string()))?;
                let raw = self
                    .weather
                    .current_by_city(&input.location, input.units)
                    .await?;
                format::current_text(&raw, input.units)?
            }
            "get_weather_forecast" => {
                let input: GetWeatherForecastInput = serde_json::from_value(tool_call.arguments)
                    .map_err(|e| WeatherError::invalid_arguments(e.to_string()))?;
                let raw = self.weather.forecast(&input.location, input.units).await?;
                format::forecast_text(&raw, input.units)?
            }
            "get_weather_by_coordinates" => {
                let input: GetWeatherByCoordinatesInput =
                    serde_json::from_value(tool_call.arguments)
                        .map_err(|e| WeatherError::invalid_arguments(e.to_string()))?;
                let raw = self
                    .weather
                    .current_by_coords(input.latitude, input.longitude, input.units)
                    .await?;
                format::current_text(&raw, input.units)?
            }
            // validate() already rejects unregistered names; keep the arms
            // and the registry in lockstep
            _ => return Err(WeatherError::unknown_tool(tool_call.name)),
        };

        Ok(ToolResult {
            content,
            is_error: false,
        })
    }
}
