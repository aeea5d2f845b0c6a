#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_ec2::config::Region;
#[cfg(feature = "lambda")]
use ec2_port_rule::utils::logger;
#[cfg(feature = "lambda")]
use ec2_port_rule::{
    ConfigServiceSink, Ec2Directory, EvaluationSink, LambdaConfig, RuleEngine, RuleEvent,
    RuleInvocation,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Serialize;

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub evaluations_submitted: usize,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<RuleEvent>) -> Result<Response, Error> {
    tracing::info!("Starting open-port compliance evaluation");

    let invocation = RuleInvocation::from_event(&event.payload)?;

    let lambda_config = LambdaConfig::from_env();
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = lambda_config.region.clone() {
        loader = loader.region(Region::new(region));
    }
    let config = loader.load().await;

    let directory = Ec2Directory::new(aws_sdk_ec2::Client::new(&config));
    let sink = ConfigServiceSink::new(aws_sdk_config::Client::new(&config));

    let engine = RuleEngine::new(&directory, &directory);
    let records = engine.run(&invocation).await?;

    tracing::info!("Evaluations: {}", serde_json::to_string(&records)?);

    sink.submit(&records, &invocation.result_token).await?;

    Ok(Response {
        message: "Evaluation submitted".to_string(),
        evaluations_submitted: records.len(),
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
