use derive_getters::Getters;
use serde::Deserialize;

#[derive(Debug, Deserialize, Getters)]
pub struct ChartResponseDto {
    chart: ChartDto,
}

impl ChartResponseDto {
    pub fn into_first_result(self) -> Option<ChartResultDto> {
        self.chart
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
    }
}

#[derive(Debug, Deserialize, Getters)]
pub struct ChartDto {
    result: Option<Vec<ChartResultDto>>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct ChartResultDto {
    meta: ChartMetaDto,
    indicators: Option<ChartIndicatorsDto>,
}

/// Metadata block of the chart payload. Completeness varies by symbol
/// and exchange, so every field is optional.
#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetaDto {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    regular_market_volume: Option<f64>,
    volume: Option<f64>,
    market_cap: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
    exchange_name: Option<String>,
    full_exchange_name: Option<String>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct ChartIndicatorsDto {
    quote: Option<Vec<ChartQuoteIndicatorDto>>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct ChartQuoteIndicatorDto {
    close: Option<Vec<Option<f64>>>,
}
