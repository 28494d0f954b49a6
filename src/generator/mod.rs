use crate::transpiler::model::{
    ContractFunction, ContractModel, Instruction, StorageVariable, Visibility,
};

// Replaced by the module name in lib.cairo and deploy script templates.
pub const MODULE_PLACEHOLDER: &str = "{{Caironame}}";

pub fn generate(contract: ContractModel) -> String {
    let name = &contract.name;

    let lines = [
        "#[starknet::interface]".to_string(),
        format!("pub trait I{}<TContractState> {{", name),
        generate_interface(&contract.functions),
        "}".to_string(),
        String::new(),
        "#[starknet::contract]".to_string(),
        format!("mod {} {{", name),
        "    use core::starknet::storage::{StoragePointerReadAccess, StoragePointerWriteAccess};"
            .to_string(),
        String::new(),
        "    #[storage]".to_string(),
        "    struct Storage {".to_string(),
        generate_storage(&contract.storage),
        "    }".to_string(),
        String::new(),
        "    #[abi(embed_v0)]".to_string(),
        format!("    impl {}Impl of super::I{}<ContractState> {{", name, name),
        generate_implementation(&contract.functions),
        "    }".to_string(),
        "}".to_string(),
    ];

    lines.join("\n")
}

fn generate_interface(functions: &[ContractFunction]) -> String {
    functions
        .iter()
        .map(|func| format!("    {};", signature(func, "TContractState")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn generate_storage(storage: &[StorageVariable]) -> String {
    storage
        .iter()
        .map(|var| format!("        {}: {}", var.name, var.ty))
        .collect::<Vec<_>>()
        .join(",\n")
}

fn generate_implementation(functions: &[ContractFunction]) -> String {
    functions
        .iter()
        .map(generate_function)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn generate_function(func: &ContractFunction) -> String {
    let mut lines = vec![format!("        {} {{", signature(func, "ContractState"))];
    lines.extend(
        func.body
            .iter()
            .map(|instruction| format!("            {}", generate_instruction(instruction))),
    );
    lines.push("        }".to_string());
    lines.join("\n")
}

fn signature(func: &ContractFunction, state: &str) -> String {
    let self_param = match func.visibility {
        Visibility::View => format!("self: @{}", state),
        Visibility::External => format!("ref self: {}", state),
    };

    let params = std::iter::once(self_param)
        .chain(func.params.iter().map(|p| format!("{}: {}", p.name, p.ty)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("fn {}({}) -> {}", func.name, params, func.return_type)
}

fn generate_instruction(instruction: &Instruction) -> String {
    match instruction {
        Instruction::Write(var, value) => format!("self.{}.write({});", var, value),
        Instruction::ReadReturn(var) => format!("self.{}.read()", var),
    }
}

/// Every occurrence of the placeholder is substituted, not only the first.
pub fn render_template(template: &str, module: &str) -> String {
    template.replace(MODULE_PLACEHOLDER, module)
}

pub fn default_lib(module: &str) -> String {
    format!("mod {};\n", module)
}
