use apigen_core::transform::name_normalizer::normalize_name;

#[test]
fn operation_id_casings() {
    let n = normalize_name("showPetById");
    assert_eq!(n.pascal_case, "ShowPetById");
    assert_eq!(n.snake_case, "show_pet_by_id");
}

#[test]
fn component_names_keep_their_words() {
    assert_eq!(normalize_name("PetOwner").pascal_case, "PetOwner");
    assert_eq!(normalize_name("pet_owner").pascal_case, "PetOwner");
    assert_eq!(normalize_name("pet-store-api").snake_case, "pet_store_api");
    assert_eq!(normalize_name("Pet.v2").pascal_case, "PetV2");
}

#[test]
fn path_like_names() {
    let n = normalize_name("/pets/{petId}/photos");
    assert_eq!(n.pascal_case, "PetsPetIdPhotos");
    assert_eq!(n.snake_case, "pets_pet_id_photos");
}

#[test]
fn display_shows_the_original() {
    let n = normalize_name("get.pet");
    assert_eq!(n.to_string(), "get.pet");
    assert_eq!(n.snake_case, "get_pet");
}
