//! BillingService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use billing_types::{
        AppError, BillingRepository, CreateFacturaRequest, Decimal, Factura, FacturaId,
        RegisterServicioRequest, RepoError, Servicio, ServicioId,
    };

    use crate::BillingService;

    /// Simple in-memory repository for testing the service layer.
    ///
    /// Vectors keep insertion order, matching the real adapters.
    pub struct MockRepo {
        servicios: Mutex<Vec<Servicio>>,
        facturas: Mutex<Vec<Factura>>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                servicios: Mutex::new(Vec::new()),
                facturas: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BillingRepository for MockRepo {
        async fn save_servicio(&self, servicio: Servicio) -> Result<Servicio, RepoError> {
            let mut servicios = self.servicios.lock().unwrap();
            match servicios.iter_mut().find(|s| s.id == servicio.id) {
                Some(existing) => *existing = servicio.clone(),
                None => servicios.push(servicio.clone()),
            }
            Ok(servicio)
        }

        async fn find_servicio(&self, id: &ServicioId) -> Result<Option<Servicio>, RepoError> {
            Ok(self
                .servicios
                .lock()
                .unwrap()
                .iter()
                .find(|s| &s.id == id)
                .cloned())
        }

        async fn list_servicios(&self) -> Result<Vec<Servicio>, RepoError> {
            Ok(self.servicios.lock().unwrap().clone())
        }

        async fn insert_factura(&self, factura: Factura) -> Result<Factura, RepoError> {
            self.facturas.lock().unwrap().push(factura.clone());
            Ok(factura)
        }

        async fn find_factura(&self, id: &FacturaId) -> Result<Option<Factura>, RepoError> {
            Ok(self
                .facturas
                .lock()
                .unwrap()
                .iter()
                .find(|f| &f.id == id)
                .cloned())
        }

        async fn list_facturas(&self) -> Result<Vec<Factura>, RepoError> {
            Ok(self.facturas.lock().unwrap().clone())
        }

        async fn mark_factura_paid(&self, id: &FacturaId) -> Result<Factura, RepoError> {
            let mut facturas = self.facturas.lock().unwrap();
            let factura = facturas
                .iter_mut()
                .find(|f| &f.id == id)
                .ok_or(RepoError::NotFound)?;
            factura
                .pay()
                .map_err(|e| RepoError::Conflict(e.to_string()))?;
            Ok(factura.clone())
        }

        async fn delete_factura(&self, id: &FacturaId) -> Result<bool, RepoError> {
            let mut facturas = self.facturas.lock().unwrap();
            let before = facturas.len();
            facturas.retain(|f| &f.id != id);
            Ok(facturas.len() != before)
        }
    }

    fn create_service() -> BillingService<MockRepo> {
        BillingService::new(MockRepo::new())
    }

    fn servicio_req(nombre: &str, costo: Decimal) -> RegisterServicioRequest {
        RegisterServicioRequest {
            id: None,
            nombre: nombre.to_string(),
            costo,
        }
    }

    fn factura_req(ids: &[&ServicioId]) -> CreateFacturaRequest {
        CreateFacturaRequest {
            servicios_ids: Some(ids.iter().map(|id| id.to_string()).collect()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Servicio Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_register_servicio_success() {
        let service = create_service();

        let servicio = service
            .register_servicio(servicio_req("Consulta", dec!(50000)))
            .await
            .unwrap();

        assert!(!servicio.id.as_str().is_empty());
        assert_eq!(servicio.nombre, "Consulta");
        assert_eq!(servicio.costo, dec!(50000));
    }

    #[tokio::test]
    async fn test_register_servicio_keeps_given_id() {
        let service = create_service();

        let servicio = service
            .register_servicio(RegisterServicioRequest {
                id: Some("S1".into()),
                nombre: "Vacuna".into(),
                costo: dec!(20),
            })
            .await
            .unwrap();

        assert_eq!(servicio.id.as_str(), "S1");
    }

    #[tokio::test]
    async fn test_register_servicio_invalid_cost_not_persisted() {
        let service = create_service();

        for costo in [Decimal::ZERO, dec!(-10)] {
            let result = service.register_servicio(servicio_req("Consulta", costo)).await;
            assert!(matches!(result, Err(AppError::BadRequest(_))));
        }

        assert!(service.list_servicios().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_servicio_empty_name_not_persisted() {
        let service = create_service();

        let result = service.register_servicio(servicio_req("", dec!(10))).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(service.list_servicios().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_servicio_same_id_overwrites() {
        let service = create_service();
        for (nombre, costo) in [("Consulta", dec!(10)), ("Consulta urgente", dec!(30))] {
            service
                .register_servicio(RegisterServicioRequest {
                    id: Some("S1".into()),
                    nombre: nombre.into(),
                    costo,
                })
                .await
                .unwrap();
        }

        let all = service.list_servicios().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].costo, dec!(30));
    }

    #[tokio::test]
    async fn test_get_servicio_round_trip() {
        let service = create_service();
        let created = service
            .register_servicio(servicio_req("Consulta", dec!(50000)))
            .await
            .unwrap();

        let fetched = service.get_servicio(&created.id).await.unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_servicio_not_found() {
        let service = create_service();

        let result = service.get_servicio(&ServicioId::from("missing")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Factura Tests
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_factura_total_is_sum() {
        let service = create_service();
        let a = service
            .register_servicio(servicio_req("Consulta", dec!(50000)))
            .await
            .unwrap();
        let b = service
            .register_servicio(servicio_req("Vacuna", dec!(15000.50)))
            .await
            .unwrap();

        let factura = service.create_factura(factura_req(&[&a.id, &b.id])).await.unwrap();

        assert_eq!(factura.total(), dec!(65000.50));
        assert!(!factura.pagada);
        assert_eq!(factura.servicios().len(), 2);
    }

    #[tokio::test]
    async fn test_create_factura_empty_list_fails() {
        let service = create_service();

        let empty = service.create_factura(factura_req(&[])).await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));

        let missing = service
            .create_factura(CreateFacturaRequest { servicios_ids: None })
            .await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        assert!(service.list_facturas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_factura_unknown_servicio_is_bad_request() {
        let service = create_service();
        let a = service
            .register_servicio(servicio_req("Consulta", dec!(10)))
            .await
            .unwrap();

        let result = service
            .create_factura(factura_req(&[&a.id, &ServicioId::from("unknown-id")]))
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("unknown-id")));
        assert!(service.list_facturas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_factura_total_overflow_is_bad_request() {
        let service = create_service();
        let big = service
            .register_servicio(servicio_req("Cirugia", dec!(50000000000000000000000000000)))
            .await
            .unwrap();

        let result = service.create_factura(factura_req(&[&big.id, &big.id])).await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("total")));
        assert!(service.list_facturas().await.unwrap().is_empty());

        // A single line still fits.
        let single = service.create_factura(factura_req(&[&big.id])).await.unwrap();
        assert_eq!(single.total(), dec!(50000000000000000000000000000));
    }

    #[tokio::test]
    async fn test_get_factura_round_trip() {
        let service = create_service();
        let a = service
            .register_servicio(servicio_req("Consulta", dec!(10)))
            .await
            .unwrap();
        let created = service.create_factura(factura_req(&[&a.id])).await.unwrap();

        let fetched = service.get_factura(&created.id).await.unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_factura_not_found() {
        let service = create_service();

        let result = service.get_factura(&FacturaId::from("missing")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pay_factura_only_once() {
        let service = create_service();
        let a = service
            .register_servicio(servicio_req("Consulta", dec!(50000)))
            .await
            .unwrap();
        let factura = service.create_factura(factura_req(&[&a.id])).await.unwrap();

        let paid = service.pay_factura(&factura.id).await.unwrap();
        assert!(paid.pagada);

        let again = service.pay_factura(&factura.id).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let stored = service.get_factura(&factura.id).await.unwrap();
        assert!(stored.pagada);
    }

    #[tokio::test]
    async fn test_pay_factura_not_found() {
        let service = create_service();

        let result = service.pay_factura(&FacturaId::from("missing")).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_factura() {
        let service = create_service();
        let a = service
            .register_servicio(servicio_req("Consulta", dec!(10)))
            .await
            .unwrap();
        let factura = service.create_factura(factura_req(&[&a.id])).await.unwrap();

        service.delete_factura(&factura.id).await.unwrap();

        let gone = service.get_factura(&factura.id).await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
        assert_eq!(service.list_servicios().await.unwrap().len(), 1);

        let twice = service.delete_factura(&factura.id).await;
        assert!(matches!(twice, Err(AppError::NotFound(_))));
    }
}
