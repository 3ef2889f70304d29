use apigen_core::error::{ModelError, TransformError};
use apigen_core::ir::{
    HttpMethod, ParameterPlacement, PrimitiveType, RequestMediaType, ResponseBranch, SpecMetadata,
    TypeDescriptor,
};
use apigen_core::parse;
use apigen_core::transform;

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");
const CYCLIC: &str = include_str!("fixtures/cyclic.yaml");
const UNRESOLVABLE_STATUS: &str = include_str!("fixtures/unresolvable-status.yaml");

fn petstore() -> SpecMetadata {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    transform::transform(&spec).unwrap()
}

fn model_error(yaml: &str) -> ModelError {
    let spec = parse::from_yaml(yaml).unwrap();
    match transform::transform(&spec) {
        Err(TransformError::Model(err)) => err,
        other => panic!("expected a model error, got {other:?}"),
    }
}

fn reference(name: &str) -> TypeDescriptor {
    TypeDescriptor::Reference(format!("#/components/schemas/{name}"))
}

#[test]
fn transform_petstore() {
    let ir = petstore();
    assert_eq!(ir.info.title, "Petstore");
    assert_eq!(ir.info.version, "1.0.0");
    assert_eq!(ir.name_prefix, "Petstore");

    let ids: Vec<_> = ir.operations.iter().map(|op| op.operation_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "listPets",
            "createPet",
            "searchPets",
            "showPetById",
            "deletePet",
            "listOwners",
            "updateStats"
        ]
    );
    let methods: Vec<_> = ir.operations.iter().map(|op| op.method).collect();
    assert_eq!(
        methods,
        vec![
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Get,
            HttpMethod::Get,
            HttpMethod::Delete,
            HttpMethod::Get,
            HttpMethod::Put
        ]
    );
    assert_eq!(ir.operations[0].summary.as_deref(), Some("List all pets"));
    assert_eq!(ir.operations[3].name.snake_case, "show_pet_by_id");
}

#[test]
fn operation_outline() {
    let ir = petstore();
    let outline: Vec<String> = ir
        .operations
        .iter()
        .map(|op| {
            let branches: Vec<String> = op
                .response
                .branches
                .iter()
                .map(|(status, branch)| format!("{status}={}", branch.class_name()))
                .collect();
            format!(
                "{} {} {}: {}",
                op.method.as_str(),
                op.path,
                op.operation_id,
                branches.join(" ")
            )
        })
        .collect();
    insta::assert_snapshot!(outline.join("\n"), @r"
    GET /pets listPets: 200=Pets default=Error
    POST /pets createPet: 201=Created default=Error
    GET /pets/search searchPets: 200=Pets
    GET /pets/{petId} showPetById: 200=Pet 302=Redirect 404=NotFound
    DELETE /pets/{petId} deletePet: 200=Ok 404=NotFound
    GET /owners listOwners: 200=ListOwnersResponse200Body
    PUT /stats updateStats: 200=UpdateStatsResponse200Body 404=Error default=ErrorDefault
    ");
}

#[test]
fn component_schemas_are_registered_first() {
    let ir = petstore();
    let keys: Vec<_> = ir.refs.keys().map(String::as_str).collect();
    assert_eq!(
        &keys[..5],
        &[
            "#/components/schemas/Pet/properties/owner",
            "#/components/schemas/Pet",
            "#/components/schemas/Pets",
            "#/components/schemas/Error",
            "#/components/schemas/Stats",
        ]
    );

    let pet = match &ir.refs["#/components/schemas/Pet"] {
        TypeDescriptor::Object(o) => o,
        other => panic!("expected object, got {other:?}"),
    };
    assert_eq!(pet.class_name, "Pet");
    assert_eq!(pet.description.as_deref(), Some("A pet in the store"));
    let names: Vec<_> = pet.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "tag", "vaccinated", "owner"]);

    let id = pet.property("id").unwrap();
    assert!(id.required);
    assert_eq!(id.type_descriptor, TypeDescriptor::Primitive(PrimitiveType::Int64));
    assert_eq!(id.format.as_deref(), Some("int64"));
    assert!(!pet.property("tag").unwrap().required);
    assert_eq!(
        pet.property("vaccinated").unwrap().type_descriptor,
        TypeDescriptor::Primitive(PrimitiveType::Boolean)
    );
    assert_eq!(
        pet.property("owner").unwrap().type_descriptor.class_name(),
        Some("PetOwnerProperties")
    );

    let stats = match &ir.refs["#/components/schemas/Stats"] {
        TypeDescriptor::Object(o) => o,
        other => panic!("expected object, got {other:?}"),
    };
    assert_eq!(
        stats.property("visits").unwrap().type_descriptor,
        TypeDescriptor::Primitive(PrimitiveType::Int32)
    );
    assert_eq!(stats.property("since").unwrap().format.as_deref(), Some("date-time"));
}

#[test]
fn transform_is_idempotent() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let first = transform::transform(&spec).unwrap();
    let second = transform::transform(&spec).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn response_union_covers_declared_statuses() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let ir = transform::transform(&spec).unwrap();

    let declared_ops: Vec<_> = spec
        .paths
        .values()
        .flat_map(|item| item.operations().map(|(_, op)| op))
        .collect();
    assert_eq!(declared_ops.len(), ir.operations.len());

    for (declared_op, op) in declared_ops.iter().zip(&ir.operations) {
        let declared: Vec<_> = declared_op.responses.keys().collect();
        let branches: Vec<_> = op.response.branches.keys().collect();
        let union: Vec<_> = op.response.union.branches.keys().collect();
        assert_eq!(declared, branches, "{}", op.operation_id);
        assert_eq!(declared, union, "{}", op.operation_id);
        assert_eq!(op.response.class_name, format!("{}Response", op.name.pascal_case));
        assert_eq!(op.response.union.class_name, op.response.class_name);
    }
}

#[test]
fn path_parameters_are_always_required() {
    let ir = petstore();
    let mut checked = 0;
    for op in &ir.operations {
        for param in op.parameters.iter().filter(|p| p.placement == ParameterPlacement::Path) {
            assert!(param.property.required, "{}", op.operation_id);
            checked += 1;
        }
    }
    assert_eq!(checked, 2);

    // declared without `required` at path level
    let show = ir.operations.iter().find(|op| op.operation_id == "showPetById").unwrap();
    assert_eq!(show.parameters.len(), 1);
    assert_eq!(show.parameters[0].name, "petId");
    assert_eq!(
        show.parameters[0].property.description.as_deref(),
        Some("The id of the pet")
    );

    // operation parameter overrides the path-level one
    let delete = ir.operations.iter().find(|op| op.operation_id == "deletePet").unwrap();
    assert_eq!(delete.parameters.len(), 1);
    assert_eq!(
        delete.parameters[0].property.description.as_deref(),
        Some("Id of the pet to delete")
    );
}

#[test]
fn query_and_referenced_header_parameters() {
    let ir = petstore();
    let list = &ir.operations[0];
    let placements: Vec<_> = list
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.placement, p.property.required))
        .collect();
    assert_eq!(
        placements,
        vec![
            ("limit", ParameterPlacement::Query, false),
            ("X-Trace-Id", ParameterPlacement::Header, false),
        ]
    );
    assert_eq!(
        list.parameters[0].property.type_descriptor,
        TypeDescriptor::Primitive(PrimitiveType::Int32)
    );
}

#[test]
fn create_pet_request_union() {
    let ir = petstore();
    let create = ir.operations.iter().find(|op| op.operation_id == "createPet").unwrap();
    let body = create.request_body.as_ref().expect("should have a request body");

    assert_eq!(body.class_name, "CreatePetRequest");
    assert!(body.required);
    let tags: Vec<_> = body.content.keys().copied().collect();
    assert_eq!(tags, vec![RequestMediaType::Json, RequestMediaType::FormData]);

    let keys: Vec<_> = body.union.branches.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Json", "Form"]);
    for branch in body.union.branches.values() {
        assert_eq!(branch.components, vec![reference("Pet")]);
        assert_eq!(
            ir.class_name_of(&branch.components[0]),
            Some("Pet")
        );
    }
}

#[test]
fn referenced_request_body() {
    let ir = petstore();
    let update = ir.operations.iter().find(|op| op.operation_id == "updateStats").unwrap();
    let body = update.request_body.as_ref().unwrap();
    assert!(!body.required);
    let keys: Vec<_> = body.union.branches.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Json", "Xml"]);
    assert_eq!(body.content[&RequestMediaType::Xml], reference("Stats"));
}

#[test]
fn redirect_branch_carries_location_header() {
    let ir = petstore();
    let show = ir.operations.iter().find(|op| op.operation_id == "showPetById").unwrap();

    match &show.response.branches["200"] {
        ResponseBranch::Parametrized { class_name, payload, headers } => {
            assert_eq!(class_name, "Pet");
            assert_eq!(payload, &reference("Pet"));
            assert!(headers.is_none());
        }
        other => panic!("expected a payload branch, got {other:?}"),
    }

    match &show.response.branches["302"] {
        ResponseBranch::JustStatus { class_name, headers } => {
            assert_eq!(class_name, "Redirect");
            let headers = headers.as_ref().expect("should carry headers");
            assert_eq!(headers.class_name, "ShowPetByIdResponseRedirectHeaders");
            assert_eq!(headers.properties.len(), 1);
            let location = &headers.properties[0];
            assert_eq!(location.name, "location");
            assert!(location.required);
            assert_eq!(
                location.type_descriptor,
                TypeDescriptor::Primitive(PrimitiveType::String)
            );
        }
        other => panic!("expected a bare status branch, got {other:?}"),
    }
    assert_eq!(show.response.union.branches["302"].components.len(), 1);

    match &show.response.branches["404"] {
        ResponseBranch::JustStatus { class_name, headers } => {
            assert_eq!(class_name, "NotFound");
            assert!(headers.is_none());
        }
        other => panic!("expected a bare status branch, got {other:?}"),
    }
    assert!(show.response.union.branches["404"].components.is_empty());
}

#[test]
fn pets_array_is_registered_once() {
    let ir = petstore();
    let list = ir.operations.iter().find(|op| op.operation_id == "listPets").unwrap();
    let search = ir.operations.iter().find(|op| op.operation_id == "searchPets").unwrap();

    assert_eq!(list.response.branches["200"].payload(), Some(&reference("Pets")));
    assert_eq!(search.response.branches["200"].payload(), Some(&reference("Pets")));
    assert_eq!(list.response.branches["200"].class_name(), "Pets");

    let registered: Vec<_> = ir
        .refs
        .values()
        .filter(|d| d.class_name() == Some("Pets"))
        .collect();
    assert_eq!(registered.len(), 1);
    match registered[0] {
        TypeDescriptor::Array(array) => assert_eq!(*array.item, reference("Pet")),
        other => panic!("expected array, got {other:?}"),
    }
}

#[test]
fn list_pets_branches_with_headers_and_default() {
    let ir = petstore();
    let list = &ir.operations[0];
    let headers = list.response.branches["200"].headers().expect("should carry X-Next");
    assert_eq!(headers.class_name, "ListPetsResponsePetsHeaders");
    assert_eq!(headers.properties[0].name, "x-next");
    assert!(!headers.properties[0].required);

    let union = &list.response.union.branches["200"];
    assert_eq!(union.class_name, "Pets");
    assert_eq!(union.components.len(), 2);

    assert_eq!(list.response.branches["default"].class_name(), "Error");
}

#[test]
fn referenced_response_is_followed() {
    let ir = petstore();
    let create = ir.operations.iter().find(|op| op.operation_id == "createPet").unwrap();
    assert!(matches!(
        &create.response.branches["201"],
        ResponseBranch::JustStatus { class_name, headers: None } if class_name == "Created"
    ));
    assert_eq!(create.response.branches["default"].payload(), Some(&reference("Error")));
}

#[test]
fn repeated_branch_names_get_status_suffix() {
    let ir = petstore();
    let update = ir.operations.iter().find(|op| op.operation_id == "updateStats").unwrap();
    let names: Vec<_> = update
        .response
        .branches
        .values()
        .map(ResponseBranch::class_name)
        .collect();
    assert_eq!(names, vec!["UpdateStatsResponse200Body", "Error", "ErrorDefault"]);
    assert!(ir.refs.contains_key(
        "#/paths/~1stats/put/responses/200/content/application~1json/schema"
    ));
}

#[test]
fn inline_response_arrays_are_named_by_location() {
    let ir = petstore();
    let owners = ir.operations.iter().find(|op| op.operation_id == "listOwners").unwrap();
    let payload = owners.response.branches["200"].payload().unwrap();
    let array = match payload {
        TypeDescriptor::Array(array) => array,
        other => panic!("expected inline array, got {other:?}"),
    };
    assert_eq!(array.class_name, "ListOwnersResponse200Body");
    let item = match array.item.as_ref() {
        TypeDescriptor::Object(item) => item,
        other => panic!("expected inline object, got {other:?}"),
    };
    assert_eq!(item.class_name, "ListOwnersResponse200BodyItem");
    assert_eq!(item.property("pets").unwrap().type_descriptor, reference("Pets"));
    assert!(ir.refs.contains_key(
        "#/paths/~1owners/get/responses/200/content/application~1json/schema/items"
    ));
}

#[test]
fn cyclic_schema_resolves_lazily() {
    let spec = parse::from_yaml(CYCLIC).unwrap();
    let ir = transform::transform(&spec).unwrap();
    let node = match &ir.refs["#/components/schemas/TreeNode"] {
        TypeDescriptor::Object(o) => o,
        other => panic!("expected object, got {other:?}"),
    };
    assert_eq!(node.property("parent").unwrap().type_descriptor, reference("TreeNode"));
    match &node.property("children").unwrap().type_descriptor {
        TypeDescriptor::Array(children) => {
            assert_eq!(children.class_name, "TreeNodeChildrenProperties");
            assert_eq!(*children.item, reference("TreeNode"));
        }
        other => panic!("expected array, got {other:?}"),
    }
    let get = &ir.operations[0];
    assert_eq!(
        get.parameters[0].property.type_descriptor,
        TypeDescriptor::Primitive(PrimitiveType::Int64)
    );
}

#[test]
fn bare_400_is_unresolvable() {
    match model_error(UNRESOLVABLE_STATUS) {
        ModelError::UnresolvableStatusCode { location, status } => {
            assert_eq!(status, "400");
            assert_eq!(location, "#/paths/~1pets/get/responses/400");
        }
        other => panic!("expected UnresolvableStatusCode, got {other:?}"),
    }
}

const HEADER: &str = r#"
openapi: "3.0.3"
info:
  title: Errors
  version: "1"
"#;

fn doc(body: &str) -> String {
    format!("{HEADER}{body}")
}

#[test]
fn duplicate_operation_ids_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
  /b:
    get:
      operationId: list_pets
      responses:
        "200":
          description: ok
"#));
    assert_eq!(
        err,
        ModelError::DuplicateOperationId {
            operation_id: "list_pets".into(),
            first: "#/paths/~1a/get".into(),
            second: "#/paths/~1b/get".into(),
        }
    );
}

#[test]
fn missing_operation_id_is_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      responses:
        "200":
          description: ok
"#));
    assert!(matches!(
        err,
        ModelError::MissingRequiredOperationShape { ref location, .. } if location == "#/paths/~1a/get"
    ));
}

#[test]
fn unsupported_methods_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    patch:
      operationId: patchA
      responses:
        "200":
          description: ok
"#));
    match err {
        ModelError::MissingRequiredOperationShape { detail, .. } => assert!(detail.contains("patch")),
        other => panic!("unexpected {other:?}"),
    }

    let err = model_error(&doc("paths:\n  /a: {}\n"));
    assert!(matches!(err, ModelError::MissingRequiredOperationShape { .. }));
}

#[test]
fn operation_without_responses_is_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      operationId: getA
"#));
    match err {
        ModelError::MissingRequiredOperationShape { detail, .. } => {
            assert!(detail.contains("no responses"))
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn undeclared_path_placeholder_is_rejected() {
    let err = model_error(&doc(r#"
paths:
  /pets/{petId}:
    get:
      operationId: showPet
      responses:
        "200":
          description: ok
"#));
    match err {
        ModelError::MissingRequiredOperationShape { detail, .. } => {
            assert!(detail.contains("{petId}"))
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn cookie_parameters_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      operationId: getA
      parameters:
        - name: session
          in: cookie
          schema:
            type: string
      responses:
        "200":
          description: ok
"#));
    assert!(matches!(
        err,
        ModelError::UnsupportedSchemaShape { ref location, .. } if location == "#/paths/~1a/get/parameters/0"
    ));
}

#[test]
fn object_parameters_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      operationId: getA
      parameters:
        - name: filter
          in: query
          schema:
            type: object
      responses:
        "200":
          description: ok
"#));
    assert!(matches!(
        err,
        ModelError::UnsupportedSchemaShape { ref location, .. } if location == "#/paths/~1a/get/parameters/0/schema"
    ));
}

#[test]
fn unsupported_schema_types_are_rejected() {
    let err = model_error(&doc(r#"
paths: {}
components:
  schemas:
    Price:
      type: object
      properties:
        amount:
          type: number
"#));
    assert!(matches!(
        err,
        ModelError::UnsupportedSchemaShape { ref location, .. }
            if location == "#/components/schemas/Price/properties/amount"
    ));

    let err = model_error(&doc(r##"
paths: {}
components:
  schemas:
    Base:
      type: object
    Derived:
      allOf:
        - $ref: "#/components/schemas/Base"
"##));
    match err {
        ModelError::UnsupportedSchemaShape { detail, .. } => assert!(detail.contains("allOf")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unsupported_media_types_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /a:
    post:
      operationId: postA
      requestBody:
        content:
          text/plain:
            schema:
              type: string
      responses:
        "200":
          description: ok
"#));
    assert_eq!(
        err,
        ModelError::UnsupportedMediaType {
            location: "#/paths/~1a/post/requestBody/content/text~1plain".into(),
            media_type: "text/plain".into(),
        }
    );

    let err = model_error(&doc(r#"
paths:
  /a:
    get:
      operationId: getA
      responses:
        "200":
          description: ok
          content:
            text/csv:
              schema:
                type: string
"#));
    assert!(matches!(err, ModelError::UnsupportedMediaType { ref media_type, .. } if media_type == "text/csv"));
}

#[test]
fn inline_only_request_body_is_treated_as_absent() {
    let spec = parse::from_yaml(&doc(r#"
paths:
  /a:
    post:
      operationId: postA
      requestBody:
        content:
          application/json:
            schema:
              type: object
      responses:
        "201":
          description: created
"#))
    .unwrap();
    let ir = transform::transform(&spec).unwrap();
    assert!(ir.operations[0].request_body.is_none());
}

#[test]
fn unresolved_references_are_rejected() {
    let err = model_error(&doc(r##"
paths:
  /a:
    get:
      operationId: getA
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Missing"
"##));
    assert_eq!(
        err,
        ModelError::UnresolvedReference {
            location: "#/paths/~1a/get/responses/200/content/application~1json/schema".into(),
            reference: "#/components/schemas/Missing".into(),
        }
    );
}

#[test]
fn synthesized_name_collisions_are_rejected() {
    let err = model_error(&doc(r#"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
components:
  schemas:
    ListPetsResponse:
      type: object
"#));
    assert_eq!(
        err,
        ModelError::NameCollision {
            name: "ListPetsResponse".into(),
            first: "#/components/schemas/ListPetsResponse".into(),
            second: "#/paths/~1pets/get/responses".into(),
        }
    );

    let err = model_error(&doc(r#"
paths: {}
components:
  schemas:
    pet:
      type: object
    Pet:
      type: object
"#));
    assert!(matches!(err, ModelError::NameCollision { ref name, .. } if name == "Pet"));
}

#[test]
fn primitive_components_are_inlined() {
    let spec = parse::from_yaml(&doc(r##"
paths:
  /a/{id}:
    get:
      operationId: getA
      parameters:
        - name: id
          in: path
          schema:
            $ref: "#/components/schemas/Id"
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Id"
components:
  schemas:
    Id:
      type: integer
      format: int64
"##))
    .unwrap();
    let ir = transform::transform(&spec).unwrap();
    assert!(ir.refs.is_empty());
    let op = &ir.operations[0];
    assert_eq!(
        op.parameters[0].property.type_descriptor,
        TypeDescriptor::Primitive(PrimitiveType::Int64)
    );
    assert_eq!(op.response.branches["200"].class_name(), "Ok");
    assert_eq!(
        op.response.branches["200"].payload(),
        Some(&TypeDescriptor::Primitive(PrimitiveType::Int64))
    );
}
