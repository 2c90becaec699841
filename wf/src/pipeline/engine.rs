//! TurnEngine - drives one conversation turn through the decision stages
//!
//! Stage order per turn: classify -> off-topic gate -> place-search
//! extraction -> route extraction -> examine -> tool invocation. A completed
//! tool call triggers exactly one re-entrant pass (classification of the
//! synthetic tool summary, then response formulation); a tool result can
//! never produce another tool call.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info, warn};

use sessionstore::{FunctionRequest, PlaceType, Role, RouteParams, RoutePoint, SearchPlaceParams, SessionStore, TripState};

use crate::config::AgentConfig;
use crate::llm::{CompletionRequest, LlmClient, extract_json};
use crate::prompts::{PromptContext, PromptLoader, PromptStage};
use crate::tools::{ToolAdapter, ToolOutcome};

use super::extract::{
    Classification, Intent, PlaceExtraction, RouteExtraction, parse_classification, parse_place_extraction,
    parse_response_text, parse_route_extraction,
};

/// Reply when a turn fails for any unexpected reason
const GENERIC_FAILURE: &str = "I apologize, but I encountered an error. Please try again.";

/// Reply when a stage's output could not be interpreted at all
const CLARIFY_GENERAL: &str =
    "I'm sorry, I had trouble understanding that. Could you rephrase your request with the places or route you have in mind?";

/// Reply when neither a place search nor a route could be extracted
const CLARIFY_ROUTE: &str =
    "I couldn't work out a place search or a route from that. Could you tell me where you want to go, or what you're looking for nearby?";

/// Ordinary off-topic redirect
const OFF_TOPIC_REDIRECT: &str =
    "I can only help with trip planning: routes, restaurants, hotels, rest areas, and places to visit. What trip can I help you with?";

/// Escalation warning appended in the middle tier
const OFF_TOPIC_WARNING: &str =
    "We've drifted away from travel topics a few times now; if this keeps up I'll have to end the conversation.";

/// Terminal refusal once the hard-stop threshold is reached
const OFF_TOPIC_REFUSAL: &str =
    "I'm sorry, but I have to stop here. I can only assist with trip planning topics such as routes, restaurants, hotels, and rest areas.";

/// Drives conversation turns against the LLM and the tool services
pub struct TurnEngine {
    llm: Arc<dyn LlmClient>,
    adapter: ToolAdapter,
    prompts: PromptLoader,
    config: AgentConfig,
}

impl TurnEngine {
    pub fn new(llm: Arc<dyn LlmClient>, adapter: ToolAdapter, prompts: PromptLoader, config: AgentConfig) -> Self {
        Self {
            llm,
            adapter,
            prompts,
            config,
        }
    }

    /// Run one user-initiated turn to completion
    ///
    /// Always produces exactly one reply string. On an unexpected failure the
    /// trip state is restored to its pre-turn snapshot and the user gets the
    /// generic apology; raw errors never surface.
    pub async fn run_turn(&self, session: &mut SessionStore, message: &str) -> String {
        info!(message_len = message.len(), "run_turn: started");
        session.append_turn(Role::User, message);
        let snapshot = session.trip().clone();

        let reply = match self.run_stages(session, message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "run_turn: turn failed, restoring trip state");
                session.restore_trip_state(snapshot);
                GENERIC_FAILURE.to_string()
            }
        };

        session.append_turn(Role::Assistant, &reply);
        reply
    }

    /// Stages 1-6 for a user message
    async fn run_stages(&self, session: &mut SessionStore, message: &str) -> Result<String> {
        // Stage 1: classify
        let Some(classification) = self.classify(session, message).await? else {
            debug!("run_stages: classification unparsable");
            return Ok(CLARIFY_GENERAL.to_string());
        };
        debug!(intent = ?classification.intent, thought = %classification.thought, "run_stages: classified");

        // Stage 2: off-topic gate
        if classification.intent == Intent::OffTopic {
            return Ok(self.off_topic_reply(session));
        }
        session.reset_off_topic();

        // Stage 3: place-search extraction
        match self.extract_place(session, message).await? {
            Some(PlaceExtraction::Resolved { lat, lon, place_type }) => {
                return self.invoke_search_place(session, lat, lon, place_type).await;
            }
            Some(PlaceExtraction::Invalid { problem }) => {
                debug!(%problem, "run_stages: place extraction invalid");
                return Ok(format!("I need a bit more before I can search: {problem}. Could you clarify?"));
            }
            Some(PlaceExtraction::Unresolved { thought }) => {
                debug!(%thought, "run_stages: not a place search, trying route extraction");
            }
            None => {
                debug!("run_stages: place extraction unparsable");
                return Ok(CLARIFY_GENERAL.to_string());
            }
        }

        // Stage 4: route extraction
        match self.extract_route(session, message).await? {
            Some(RouteExtraction::Extracted(patch)) => {
                session.merge_trip_state(&patch);

                // Stage 5: examine route feasibility against accumulated state
                let missing = missing_route_fields(session.trip());
                if !missing.is_empty() {
                    debug!(?missing, "run_stages: route not yet feasible");
                    return Ok(missing_info_reply(&missing));
                }

                // Stage 6: invoke route
                let Some(params) = build_route_params(session.trip()) else {
                    // Feasibility just passed, so this is a coordinate glitch
                    warn!("run_stages: feasible trip state failed to yield route params");
                    return Ok(CLARIFY_ROUTE.to_string());
                };
                self.invoke_route(session, params).await
            }
            Some(RouteExtraction::Unusable { thought }) => {
                debug!(%thought, "run_stages: route extraction unusable");
                Ok(CLARIFY_ROUTE.to_string())
            }
            None => {
                debug!("run_stages: route extraction unparsable");
                Ok(CLARIFY_GENERAL.to_string())
            }
        }
    }

    // === Tool invocation (stages 3b and 6) ===

    async fn invoke_search_place(
        &self,
        session: &mut SessionStore,
        lat: f64,
        lon: f64,
        place_type: PlaceType,
    ) -> Result<String> {
        let params = SearchPlaceParams {
            lat,
            lon,
            radius_meters: self.config.default_radius_meters,
            place_type,
        };
        info!(%place_type, lat, lon, radius = params.radius_meters, "invoking search_place");

        let request = FunctionRequest::search_place(params);
        let request_id = request.request_id;
        let function_params = request.params.clone();
        session.log_function_request(request);

        let outcome = self.adapter.invoke(&function_params).await;
        session.resolve_function_request(request_id, outcome.result.clone(), &outcome.result_short);

        self.finish_tool_call(session, "search_place", outcome).await
    }

    async fn invoke_route(&self, session: &mut SessionStore, params: RouteParams) -> Result<String> {
        info!(
            start = %params.start.name.as_deref().unwrap_or("?"),
            end = %params.end.name.as_deref().unwrap_or("?"),
            waypoints = params.waypoints.len(),
            "invoking route"
        );

        let request = FunctionRequest::route(params);
        let request_id = request.request_id;
        let function_params = request.params.clone();
        session.log_function_request(request);

        let outcome = self.adapter.invoke(&function_params).await;
        session.resolve_function_request(request_id, outcome.result.clone(), &outcome.result_short);

        self.finish_tool_call(session, "route", outcome).await
    }

    /// Append the synthetic tool summary and run the bounded re-entrant pass
    async fn finish_tool_call(&self, session: &mut SessionStore, name: &str, outcome: ToolOutcome) -> Result<String> {
        let summary = format!("{} completed. {}", name, outcome.result_short);
        session.append_turn(Role::System, &summary);

        if self.config.max_tool_depth == 0 {
            return Ok(outcome.result_short);
        }

        // Re-entrant pass, capped at one: classification runs on the synthetic
        // system message (the off-topic gate does not apply to it), then the
        // pipeline short-circuits to response formulation. Tool stages never
        // run here.
        match self.classify(session, &summary).await? {
            Some(classification) => {
                debug!(intent = ?classification.intent, "finish_tool_call: re-entrant pass classified")
            }
            None => debug!("finish_tool_call: re-entrant classification unparsable"),
        }

        self.respond(session, &summary, &outcome.result_short).await
    }

    // === LLM stage calls ===

    async fn classify(&self, session: &SessionStore, message: &str) -> Result<Option<Classification>> {
        let value = self.stage_call(PromptStage::Classify, session, message).await?;
        Ok(value.as_ref().and_then(parse_classification))
    }

    async fn extract_place(&self, session: &SessionStore, message: &str) -> Result<Option<PlaceExtraction>> {
        let value = self.stage_call(PromptStage::PlaceSearch, session, message).await?;
        Ok(value.as_ref().map(parse_place_extraction))
    }

    async fn extract_route(&self, session: &SessionStore, message: &str) -> Result<Option<RouteExtraction>> {
        let value = self.stage_call(PromptStage::RouteExtract, session, message).await?;
        Ok(value.as_ref().map(parse_route_extraction))
    }

    /// Response formulation; falls back to the tool summary when the output
    /// cannot be parsed, so the user still gets a natural sentence
    async fn respond(&self, session: &SessionStore, message: &str, fallback: &str) -> Result<String> {
        let value = self.stage_call(PromptStage::Respond, session, message).await?;
        match value.as_ref().and_then(parse_response_text) {
            Some(reply) => Ok(reply),
            None => {
                debug!("respond: output unparsable, falling back to tool summary");
                Ok(fallback.to_string())
            }
        }
    }

    /// Render a stage prompt, call the LLM, and recover a JSON object
    async fn stage_call(
        &self,
        stage: PromptStage,
        session: &SessionStore,
        message: &str,
    ) -> Result<Option<serde_json::Value>> {
        let context = PromptContext {
            state: serde_json::to_string(session.trip())?,
            history: session.recent_history(self.config.history_window),
            message: message.to_string(),
        };
        let prompt = self.prompts.render(stage, &context)?;

        let response = self
            .llm
            .complete(CompletionRequest {
                prompt,
                max_tokens: 2048,
            })
            .await?;

        Ok(extract_json(&response.content))
    }

    // === Deterministic replies ===

    /// Three-tier escalation: redirect, redirect + warning, terminal refusal
    fn off_topic_reply(&self, session: &mut SessionStore) -> String {
        let count = session.increment_off_topic();
        if count >= self.config.off_topic_stop_threshold {
            info!(count, "off-topic hard stop reached");
            OFF_TOPIC_REFUSAL.to_string()
        } else if count >= self.config.off_topic_warn_threshold {
            debug!(count, "off-topic warning tier");
            format!("{OFF_TOPIC_REDIRECT} {OFF_TOPIC_WARNING}")
        } else {
            OFF_TOPIC_REDIRECT.to_string()
        }
    }
}

/// The route fields still missing from accumulated trip state
///
/// A route is feasible only when start coordinates, end coordinates (with
/// `end_at_start` letting the start double as the end), and the daily driving
/// limit are all known.
fn missing_route_fields(trip: &TripState) -> Vec<&'static str> {
    let mut missing = Vec::new();

    let start_coords = trip.start.as_ref().and_then(|p| p.coords());
    if start_coords.is_none() {
        missing.push("the start location");
    }

    let end = trip
        .end
        .as_ref()
        .or_else(|| (trip.end_at_start == Some(true)).then_some(trip.start.as_ref()).flatten());
    if end.and_then(|p| p.coords()).is_none() {
        missing.push("the destination");
    }

    if trip.max_driving_hours_per_day.is_none() {
        missing.push("your maximum driving hours per day");
    }

    missing
}

/// Reply requesting exactly the missing pieces
fn missing_info_reply(missing: &[&str]) -> String {
    format!("I can plan that route once I know: {}.", missing.join(", "))
}

/// Build route params from feasible trip state
///
/// Waypoints without coordinates are dropped; departure defaults to the next
/// calendar day at 09:00 local when the user gave none.
fn build_route_params(trip: &TripState) -> Option<RouteParams> {
    let start_place = trip.start.as_ref()?;
    let (start_lat, start_lon) = start_place.coords()?;

    let end_place = trip
        .end
        .as_ref()
        .or_else(|| (trip.end_at_start == Some(true)).then_some(start_place))?;
    let (end_lat, end_lon) = end_place.coords()?;

    let waypoints = trip
        .waypoints
        .iter()
        .filter_map(|w| {
            let (lat, lon) = w.coords()?;
            Some(RoutePoint {
                name: w.name.clone(),
                lat,
                lon,
            })
        })
        .collect();

    Some(RouteParams {
        start: RoutePoint {
            name: start_place.name.clone(),
            lat: start_lat,
            lon: start_lon,
        },
        end: RoutePoint {
            name: end_place.name.clone(),
            lat: end_lat,
            lon: end_lon,
        },
        waypoints,
        depart_at: Some(trip.depart_at.clone().unwrap_or_else(default_depart_at)),
    })
}

/// Next calendar day at 09:00, local time
fn default_depart_at() -> String {
    let tomorrow = chrono::Local::now().date_naive() + chrono::Days::new(1);
    format!("{}T09:00:00", tomorrow.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use crate::tools::places::mock::MockPlacesService;
    use crate::tools::route::mock::MockRouteService;
    use crate::tools::{PlacesResponse, RouteResponse};
    use sessionstore::{FunctionName, FunctionParams, NamedPlace};

    fn engine_with(llm: MockLlmClient, route: MockRouteService, places: MockPlacesService) -> TurnEngine {
        TurnEngine::new(
            Arc::new(llm),
            ToolAdapter::new(Arc::new(route), Arc::new(places)),
            PromptLoader::embedded_only(),
            AgentConfig::default(),
        )
    }

    fn ontopic() -> &'static str {
        r#"{"intent": "ONTOPIC", "thought": "travel related"}"#
    }

    fn offtopic() -> &'static str {
        r#"{"intent": "OFFTOPIC", "thought": "not travel related"}"#
    }

    fn not_a_place_search() -> &'static str {
        r#"{"thought": "not a place search"}"#
    }

    fn not_a_route() -> &'static str {
        r#"{"thought": "not a route request"}"#
    }

    // Scenario: place search happy path ("find restaurants near Paris")
    #[tokio::test]
    async fn test_place_search_happy_path() {
        let llm = MockLlmClient::scripted(&[
            ontopic(),
            r#"{"location": {"lat": 48.8566, "lon": 2.3522}, "place_type": "restaurant"}"#,
            ontopic(), // re-entrant pass classification
            r#"{"response": "I'm searching for restaurants near Paris and found Le Procope and Bouillon Chartier.", "thought": "summarize"}"#,
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(MockPlacesService::sample_response()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "find restaurants near Paris").await;

        assert!(reply.contains("restaurants near Paris"));

        let requests = session.function_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, FunctionName::SearchPlace);
        let FunctionParams::SearchPlace(params) = &requests[0].params else {
            panic!("expected search params");
        };
        assert_eq!(params.radius_meters, 8047.0);
        assert_eq!(params.place_type, PlaceType::Restaurant);
        assert!(requests[0].is_resolved());

        // The synthetic system turn carrying the tool summary is on record
        assert!(
            session
                .turns()
                .iter()
                .any(|t| t.role == Role::System && t.text.contains("search_place completed"))
        );
    }

    // Scenario: ambiguous region ("places to stay in the USA")
    #[tokio::test]
    async fn test_ambiguous_region_asks_for_clarification() {
        let llm = MockLlmClient::scripted(&[
            ontopic(),
            r#"{"thought": "the USA is far too broad an area for a place search"}"#,
            not_a_route(),
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "places to stay in the USA").await;

        assert!(session.function_requests().is_empty());
        assert!(reply.contains("Could you"));
    }

    // Scenario: incremental route building across two turns
    #[tokio::test]
    async fn test_incremental_route_building() {
        let llm = MockLlmClient::scripted(&[
            // Turn 1: only a start location
            ontopic(),
            not_a_place_search(),
            r#"{"start": {"name": "Austin", "lat": 30.2672, "lon": -97.7431}, "thought": "start only"}"#,
            // Turn 2: end location and driving hours arrive
            ontopic(),
            not_a_place_search(),
            r#"{"end": {"name": "Santa Fe", "lat": 35.687, "lon": -105.9378}, "maxDrivingHoursPerDay": 6, "thought": "rest of it"}"#,
            ontopic(), // re-entrant pass classification
            r#"{"response": "Your route from Austin to Santa Fe is ready.", "thought": "done"}"#,
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(MockRouteService::sample_response()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();

        let reply1 = engine.run_turn(&mut session, "I want to start from Austin").await;
        assert!(session.function_requests().is_empty());
        assert!(reply1.contains("the destination"));
        assert!(reply1.contains("maximum driving hours"));

        let reply2 = engine.run_turn(&mut session, "going to Santa Fe, 6 hours a day").await;
        let requests = session.function_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, FunctionName::Route);
        let FunctionParams::Route(params) = &requests[0].params else {
            panic!("expected route params");
        };
        // Start came from turn 1's merge, not this turn's extraction
        assert_eq!(params.start.name.as_deref(), Some("Austin"));
        assert_eq!(params.end.name.as_deref(), Some("Santa Fe"));
        assert!(params.depart_at.is_some());
        assert!(reply2.contains("Austin"));
    }

    // Scenario: route service returns {"routes": []}
    #[tokio::test]
    async fn test_route_service_empty_result() {
        let llm = MockLlmClient::scripted(&[
            ontopic(),
            not_a_place_search(),
            r#"{"start": {"name": "Nome", "lat": 64.5011, "lon": -165.4064},
                "end": {"name": "Honolulu", "lat": 21.3099, "lon": -157.8581},
                "maxDrivingHoursPerDay": 8, "thought": "no road exists"}"#,
            ontopic(),
            "this is not json", // respond stage fails to parse -> fallback to summary
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "drive me from Nome to Honolulu").await;

        assert!(reply.contains("No route found"));
        let request = &session.function_requests()[0];
        assert!(request.is_resolved());
        assert_eq!(request.result.as_ref().unwrap()["routes"].as_array().unwrap().len(), 0);
        // Trip state keeps the user's facts but nothing bogus from the service
        assert_eq!(session.trip().max_driving_hours_per_day, Some(8.0));
    }

    // Scenario: off-topic escalation tiers (warning at 5, refusal at 8)
    #[tokio::test]
    async fn test_off_topic_escalation_tiers() {
        let responses: Vec<String> = (0..8).map(|_| offtopic().to_string()).collect();
        let engine = engine_with(
            MockLlmClient::new(responses),
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let mut replies = Vec::new();
        for i in 0..8 {
            replies.push(engine.run_turn(&mut session, &format!("tell me a joke #{i}")).await);
        }

        assert_eq!(session.off_topic_count(), 8);
        assert!(session.function_requests().is_empty());

        // Tiers: plain redirect below 5, warning at 5..8, refusal at 8
        assert!(!replies[3].contains("end the conversation"));
        assert!(replies[4].contains("end the conversation"));
        assert!(replies[6].contains("end the conversation"));
        assert_eq!(replies[7], OFF_TOPIC_REFUSAL);
    }

    #[tokio::test]
    async fn test_on_topic_resets_off_topic_counter() {
        let llm = MockLlmClient::scripted(&[offtopic(), offtopic(), ontopic(), not_a_place_search(), not_a_route()]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        engine.run_turn(&mut session, "what about football").await;
        engine.run_turn(&mut session, "and the stock market").await;
        assert_eq!(session.off_topic_count(), 2);

        engine.run_turn(&mut session, "ok, plan me a trip").await;
        assert_eq!(session.off_topic_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_place_type_gets_targeted_clarification() {
        let llm = MockLlmClient::scripted(&[
            ontopic(),
            r#"{"location": {"lat": 48.2, "lon": 16.36}, "place_type": "museum"}"#,
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "museums near Vienna").await;

        assert!(reply.contains("museum"));
        assert!(session.function_requests().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_classification_yields_clarification() {
        let llm = MockLlmClient::scripted(&["complete nonsense, no json at all"]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "hmm").await;
        assert_eq!(reply, CLARIFY_GENERAL);
    }

    #[tokio::test]
    async fn test_llm_failure_is_one_generic_reply_and_no_state_change() {
        // Empty script: the very first LLM call errors
        let engine = engine_with(
            MockLlmClient::new(vec![]),
            MockRouteService::returning(RouteResponse::empty()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "plan me a trip").await;

        assert_eq!(reply, GENERIC_FAILURE);
        assert!(session.trip().is_empty());
        // Exactly one user turn and one assistant turn were recorded
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_llm_failure_after_merge_restores_snapshot() {
        // Route extraction merges, invocation succeeds, then the re-entrant
        // classification call fails: the pre-turn trip state must come back.
        let llm = MockLlmClient::scripted(&[
            ontopic(),
            not_a_place_search(),
            r#"{"start": {"name": "A", "lat": 1.0, "lon": 2.0},
                "end": {"name": "B", "lat": 3.0, "lon": 4.0},
                "maxDrivingHoursPerDay": 5, "thought": "x"}"#,
            // script ends: re-entrant classify errors
        ]);
        let engine = engine_with(
            llm,
            MockRouteService::returning(MockRouteService::sample_response()),
            MockPlacesService::returning(PlacesResponse::empty()),
        );

        let mut session = SessionStore::new();
        let reply = engine.run_turn(&mut session, "route from A to B, 5 hours a day").await;

        assert_eq!(reply, GENERIC_FAILURE);
        assert!(session.trip().is_empty());
        // The audit log keeps the resolved request even though the turn failed
        assert_eq!(session.function_requests().len(), 1);
        assert!(session.function_requests()[0].is_resolved());
    }

    #[test]
    fn test_missing_route_fields_reporting() {
        let mut trip = TripState::default();
        assert_eq!(
            missing_route_fields(&trip),
            vec!["the start location", "the destination", "your maximum driving hours per day"]
        );

        trip.start = Some(NamedPlace {
            name: Some("Austin".to_string()),
            lat: Some(30.2672),
            lon: Some(-97.7431),
        });
        trip.max_driving_hours_per_day = Some(6.0);
        assert_eq!(missing_route_fields(&trip), vec!["the destination"]);

        // A start without coordinates is still missing
        trip.start = Some(NamedPlace {
            name: Some("Austin".to_string()),
            lat: None,
            lon: None,
        });
        assert!(missing_route_fields(&trip).contains(&"the start location"));
    }

    #[test]
    fn test_end_at_start_resolves_missing_end() {
        let trip = TripState {
            start: Some(NamedPlace {
                name: Some("Austin".to_string()),
                lat: Some(30.2672),
                lon: Some(-97.7431),
            }),
            end_at_start: Some(true),
            max_driving_hours_per_day: Some(6.0),
            ..Default::default()
        };

        assert!(missing_route_fields(&trip).is_empty());
        let params = build_route_params(&trip).unwrap();
        assert_eq!(params.end.name.as_deref(), Some("Austin"));
        assert_eq!(params.end.lat, 30.2672);
    }

    #[test]
    fn test_build_route_params_drops_coordinate_less_waypoints() {
        let trip = TripState {
            start: Some(NamedPlace {
                name: Some("A".to_string()),
                lat: Some(1.0),
                lon: Some(2.0),
            }),
            end: Some(NamedPlace {
                name: Some("B".to_string()),
                lat: Some(3.0),
                lon: Some(4.0),
            }),
            waypoints: vec![
                NamedPlace {
                    name: Some("good".to_string()),
                    lat: Some(2.0),
                    lon: Some(3.0),
                },
                NamedPlace {
                    name: Some("nameless-coords".to_string()),
                    lat: Some(2.5),
                    lon: None,
                },
            ],
            max_driving_hours_per_day: Some(6.0),
            ..Default::default()
        };

        let params = build_route_params(&trip).unwrap();
        assert_eq!(params.waypoints.len(), 1);
        assert_eq!(params.waypoints[0].name.as_deref(), Some("good"));
    }

    #[test]
    fn test_default_depart_at_shape() {
        let depart = default_depart_at();
        assert!(depart.ends_with("T09:00:00"));
        assert_eq!(depart.len(), "2026-08-07T09:00:00".len());
    }
}
