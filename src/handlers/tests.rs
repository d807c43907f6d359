//! Router tests for the HTTP surface.

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::inference::RiskModel;
    use crate::service::stub::StubModel;
    use crate::service::PredictionService;
    use crate::{create_router, AppState};

    fn app_with(model: Option<Arc<StubModel>>) -> Router {
        let model = model.map(|m| m as Arc<dyn RiskModel>);
        create_router(AppState {
            service: Arc::new(PredictionService::new(model)),
        })
    }

    fn reference_body() -> Value {
        json!({
            "age_years": 54,
            "gender": 2,
            "height": 165,
            "weight": 70,
            "ap_hi": 130,
            "ap_lo": 80,
            "cholesterol": 2,
            "gluc": 1,
            "smoke": 0,
            "alco": 0,
            "active": 1
        })
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_ok() {
        let app = app_with(Some(Arc::new(StubModel::new(0.2, 0))));
        let (status, body) = send(app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_health_without_model() {
        let (status, body) = send(app_with(None), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "error", "detail": "Model not loaded"}));
    }

    #[tokio::test]
    async fn test_predict_reference_patient() {
        let model = Arc::new(StubModel::new(0.712349, 1));
        let app = app_with(Some(model.clone()));

        let (status, body) = send(app, Method::POST, "/predict", Some(reference_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "probability": 0.7123,
                "label": 1,
                "risk_level": "high",
                "factors": []
            })
        );
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_predict_lists_factors() {
        let app = app_with(Some(Arc::new(StubModel::new(0.5, 1))));
        let mut body = reference_body();
        body["cholesterol"] = json!(3);
        body["ap_hi"] = json!(150);
        body["weight"] = json!(90);
        body["smoke"] = json!(1);

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_level"], "medium");

        let factors = body["factors"].as_array().unwrap();
        let fields: Vec<&str> = factors.iter().map(|f| f["field"].as_str().unwrap()).collect();
        assert_eq!(fields, vec!["cholesterol", "blood_pressure", "bmi", "smoke"]);
        assert_eq!(factors[0]["status"], "high");
        assert_eq!(factors[3]["status"], "yes");
        assert_eq!(factors[0]["contribution"], Value::Null);
    }

    #[tokio::test]
    async fn test_predict_zero_diastolic() {
        let model = Arc::new(StubModel::new(0.5, 1));
        let app = app_with(Some(model.clone()));
        let mut body = reference_body();
        body["ap_lo"] = json!(0);

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("must not be zero"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_non_positive_height() {
        for height in [0, -165] {
            let model = Arc::new(StubModel::new(0.5, 1));
            let app = app_with(Some(model.clone()));
            let mut body = reference_body();
            body["height"] = json!(height);

            let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body["detail"].as_str().unwrap().contains("height must be positive"));
            assert_eq!(model.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_predict_non_numeric_age() {
        let model = Arc::new(StubModel::new(0.5, 1));
        let app = app_with(Some(model.clone()));
        let mut body = reference_body();
        body["age_years"] = json!("abc");

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("age_years"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_wrong_type_code() {
        let app = app_with(Some(Arc::new(StubModel::new(0.5, 1))));
        let mut body = reference_body();
        body["gender"] = json!("two");

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("gender"));
    }

    #[tokio::test]
    async fn test_predict_malformed_json() {
        let model = Arc::new(StubModel::new(0.5, 1));
        let app = app_with(Some(model.clone()));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"age_years": 54,"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].is_string());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_out_of_range_probability() {
        let app = app_with(Some(Arc::new(StubModel::new(f64::NAN, 1))));
        let (status, body) = send(app, Method::POST, "/predict", Some(reference_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Prediction error:"));
    }

    #[tokio::test]
    async fn test_predict_without_model() {
        let (status, body) = send(app_with(None), Method::POST, "/predict", Some(reference_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Model not loaded"));
    }

    #[tokio::test]
    async fn test_predict_out_of_range_fields() {
        let model = Arc::new(StubModel::new(0.5, 1));
        let app = app_with(Some(model.clone()));
        let mut body = reference_body();
        body["gender"] = json!(3);
        body["gluc"] = json!(4);

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("gender"));
        assert!(detail.contains("gluc"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_predict_missing_field() {
        let app = app_with(Some(Arc::new(StubModel::new(0.5, 1))));
        let mut body = reference_body();
        body.as_object_mut().unwrap().remove("age_years");

        let (status, body) = send(app, Method::POST, "/predict", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("age_years"));
    }

    #[tokio::test]
    async fn test_predict_inference_failure() {
        let app = app_with(Some(Arc::new(StubModel::failing("input shape mismatch"))));
        let (status, body) = send(app, Method::POST, "/predict", Some(reference_body())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Prediction error: input shape mismatch");
    }

    #[tokio::test]
    async fn test_model_status() {
        let app = app_with(Some(Arc::new(StubModel::new(0.2, 0))));
        let (status, body) = send(app, Method::GET, "/model", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_loaded"], true);
        assert_eq!(body["inference_count"], 0);
        assert_eq!(body["model"]["schema_version"], 1);
        assert_eq!(body["model"]["feature_names"].as_array().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn test_model_status_without_model() {
        let (status, body) = send(app_with(None), Method::GET, "/model", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_loaded"], false);
        assert_eq!(body["model"], Value::Null);
    }
}
