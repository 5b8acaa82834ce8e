use formdom::{Document, DomError, Element};

/// An order form as the server would render it, with two saved items.
pub fn order_page() -> Document {
    Document::new(
        Element::div()
            .id("page")
            .child(Element::div().id("loadingAlert").hidden(true))
            .child(
                Element::form()
                    .id("form")
                    .child(Element::input("number").id("number").value("2024-0117"))
                    .child(Element::input("zipCode").id("zipCode"))
                    .child(
                        Element::select("state")
                            .id("state")
                            .child(Element::option("", "Estado"))
                            .child(Element::option("st-rj", "Rio de Janeiro").data("acronym", "RJ"))
                            .child(Element::option("st-sp", "São Paulo").data("acronym", "SP")),
                    )
                    .child(Element::select("city").id("city").child(Element::option("", "Cidade")))
                    .child(Element::input("neighborhood").id("neighborhood"))
                    .child(Element::input("place").id("place"))
                    .child(Element::input("complement").id("complement"))
                    .child(
                        Element::div()
                            .id("subFormContainer")
                            .hidden(true)
                            .child(saved_item("h1", 0, "Bolt M8", "40"))
                            .child(saved_item("h2", 1, "Washer", "40")),
                    )
                    .child(Element::table().id("items").child(Element::table_body().id("subFormTable"))),
            )
            .child(
                Element::div()
                    .id("itemModal")
                    .hidden(true)
                    .child(
                        Element::div()
                            .id("subForm")
                            .child(Element::input("description").id("description"))
                            .child(Element::input("quantity").id("quantity")),
                    )
                    .child(Element::hidden_input("editingHash", "").id("editingHash"))
                    .child(Element::button("Adicionar").id("addButton"))
                    .child(Element::button("Atualizar").id("updateButton")),
            )
            .child(
                Element::div()
                    .id("confirmDeletion")
                    .hidden(true)
                    .child(Element::button("Confirmar").id("confirmDelete")),
            ),
    )
}

fn saved_item(hash: &str, index: usize, description: &str, quantity: &str) -> Element {
    Element::div()
        .id(format!("saved-{hash}"))
        .hidden(true)
        .data("hash", hash)
        .data(
            "fields",
            format!(r#"{{"description":"{description}","quantity":"{quantity}"}}"#),
        )
        .child(Element::hidden_input(format!("items[{index}].description"), description))
        .child(Element::hidden_input(format!("items[{index}].quantity"), quantity))
}

pub fn fill_item(doc: &mut Document, description: &str, quantity: &str) -> Result<(), DomError> {
    doc.set_value("description", description)?;
    doc.set_value("quantity", quantity)
}
